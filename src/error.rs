//! Error types for the reverser.

use crate::species::Species;

/// Error returned when a reversal or reverser setup fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReverseError {
    /// Strict mode: input length is not a multiple of the lane width
    InvalidLength {
        /// Input length.
        len: usize,
        /// Lane width of the reverser's species.
        lane_width: usize,
    },
    /// Output buffer length differs from input length
    LengthMismatch {
        /// Input length.
        input: usize,
        /// Output buffer length.
        output: usize,
    },
    /// The running CPU lacks the features this species needs
    UnsupportedSpecies(Species),
    /// Species name did not parse
    UnknownSpecies(String),
}

impl std::fmt::Display for ReverseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReverseError::InvalidLength { len, lane_width } => write!(
                f,
                "input length {} is not a multiple of the lane width {}",
                len, lane_width
            ),
            ReverseError::LengthMismatch { input, output } => write!(
                f,
                "output length {} does not match input length {}",
                output, input
            ),
            ReverseError::UnsupportedSpecies(species) => write!(
                f,
                "species '{}' is not supported on this CPU",
                species.name()
            ),
            ReverseError::UnknownSpecies(name) => write!(
                f,
                "unknown species '{}' (expected avx512, avx2, sse2, neon or portable)",
                name
            ),
        }
    }
}

impl std::error::Error for ReverseError {}
