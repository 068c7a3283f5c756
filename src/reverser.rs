//! The vectorised reverser.
//!
//! Reversal runs in two granularities at once: each block of `W` lanes is
//! stored at the mirrored block offset, and the lanes inside the block are
//! reversed by a shuffle. Together they give `out[k] == in[n - 1 - k]`.

use crate::config::ReverserConfig;
use crate::error::ReverseError;
use crate::species::Species;
use log::trace;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_REVERSER: Lazy<VectorReverser> = Lazy::new(VectorReverser::new);

/// What to do with the `len % W` elements that do not fill a whole block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Copy the leftover elements with scalar moves. Total over every length.
    #[default]
    ScalarTail,
    /// Reject lengths that are not a multiple of the lane width.
    Strict,
}

/// Reverses `i32` slices block by block with lane shuffles.
///
/// Cheap to copy; holds no buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorReverser {
    species: Species,
    policy: RemainderPolicy,
}

impl VectorReverser {
    /// A reverser using the widest species the CPU supports and
    /// [`RemainderPolicy::ScalarTail`].
    pub fn new() -> Self {
        Self {
            species: Species::preferred(),
            policy: RemainderPolicy::default(),
        }
    }

    /// A reverser pinned to `species`.
    pub fn with_species(species: Species) -> Result<Self, ReverseError> {
        if !species.is_supported() {
            return Err(ReverseError::UnsupportedSpecies(species));
        }
        Ok(Self {
            species,
            policy: RemainderPolicy::default(),
        })
    }

    /// Builds a reverser from configuration. A missing species means the
    /// preferred one.
    pub fn from_config(config: &ReverserConfig) -> Result<Self, ReverseError> {
        let reverser = match config.species {
            Some(species) => Self::with_species(species)?,
            None => Self::new(),
        };
        Ok(reverser.with_policy(config.remainder))
    }

    /// Sets the remainder policy.
    pub fn with_policy(mut self, policy: RemainderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The backend in use.
    pub fn species(&self) -> Species {
        self.species
    }

    /// Lanes per block.
    pub fn lane_width(&self) -> usize {
        self.species.lane_width()
    }

    /// The remainder policy in use.
    pub fn policy(&self) -> RemainderPolicy {
        self.policy
    }

    /// Returns a new vector holding `input` in reverse order.
    pub fn reverse(&self, input: &[i32]) -> Result<Vec<i32>, ReverseError> {
        self.check_length(input.len())?;
        let mut output = vec![0i32; input.len()];
        self.reverse_unchecked(input, &mut output);
        Ok(output)
    }

    /// Writes `input` in reverse order into `output`.
    ///
    /// `output` must be exactly as long as `input`. On error `output` is
    /// left untouched.
    pub fn reverse_into(&self, input: &[i32], output: &mut [i32]) -> Result<(), ReverseError> {
        if input.len() != output.len() {
            return Err(ReverseError::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        self.check_length(input.len())?;
        self.reverse_unchecked(input, output);
        Ok(())
    }

    fn check_length(&self, len: usize) -> Result<(), ReverseError> {
        let lane_width = self.lane_width();
        if self.policy == RemainderPolicy::Strict && len % lane_width != 0 {
            return Err(ReverseError::InvalidLength { len, lane_width });
        }
        Ok(())
    }

    fn reverse_unchecked(&self, input: &[i32], output: &mut [i32]) {
        trace!(
            "Reversing {} elements with {} ({} lanes)",
            input.len(),
            self.species,
            self.lane_width()
        );

        let consumed = self.species.reverse_blocks(input, output);

        // Tail input [consumed, n) maps onto output [0, n - consumed).
        let tail = &input[consumed..];
        for (dst, &src) in output[..tail.len()].iter_mut().zip(tail.iter().rev()) {
            *dst = src;
        }
    }
}

impl Default for VectorReverser {
    fn default() -> Self {
        Self::new()
    }
}

/// Reverses `input` with the preferred species and a scalar tail.
///
/// Total over every input length.
pub fn reverse(input: &[i32]) -> Vec<i32> {
    let mut output = vec![0i32; input.len()];
    DEFAULT_REVERSER.reverse_unchecked(input, &mut output);
    output
}

/// Naive element-by-element reversal, the reference the vector paths are
/// checked against.
pub fn scalar_reverse(input: &[i32]) -> Vec<i32> {
    input.iter().rev().copied().collect()
}
