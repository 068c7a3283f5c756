//! CPU feature detection and species selection.
//!
//! A species names one backend and therefore one lane width. The preferred
//! species is detected once per process and cached.

use crate::backend::Backend;
use crate::backends::portable::Portable;
use crate::error::ReverseError;
use bitflags::bitflags;
use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Vector instruction sets relevant to lane reversal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CpuFeatures: u8 {
        /// x86_64 SSE2 (always present on x86_64).
        const SSE2 = 1 << 0;
        /// x86_64 AVX2.
        const AVX2 = 1 << 1;
        /// aarch64 Advanced SIMD.
        const NEON = 1 << 2;
        /// x86_64 AVX-512 Foundation.
        const AVX512F = 1 << 3;
    }
}

static DETECTED: Lazy<CpuFeatures> = Lazy::new(|| {
    let features = CpuFeatures::detect();
    debug!("Detected CPU features: {:?}", features);
    features
});

static PREFERRED: Lazy<Species> = Lazy::new(|| {
    let species = Species::best_for(CpuFeatures::current());
    debug!(
        "Preferred species: {} ({} lanes)",
        species.name(),
        species.lane_width()
    );
    species
});

impl CpuFeatures {
    /// Queries the running CPU.
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut features = CpuFeatures::empty();

        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("sse2") {
                features |= CpuFeatures::SSE2;
            }
            if is_x86_feature_detected!("avx2") {
                features |= CpuFeatures::AVX2;
            }
            if is_x86_feature_detected!("avx512f") {
                features |= CpuFeatures::AVX512F;
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                features |= CpuFeatures::NEON;
            }
        }

        features
    }

    /// Features of the running CPU, detected on first use.
    pub fn current() -> Self {
        *DETECTED
    }
}

/// Which backend (and lane width) performs the reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// 512-bit AVX-512F, 16 lanes.
    Avx512,
    /// 256-bit AVX2, 8 lanes.
    Avx2,
    /// 128-bit SSE2, 4 lanes.
    Sse2,
    /// 128-bit NEON, 4 lanes.
    Neon,
    /// Plain scalar code over 4-lane blocks.
    Portable,
}

impl Species {
    /// All species, widest first.
    pub const ALL: [Species; 5] = [
        Species::Avx512,
        Species::Avx2,
        Species::Sse2,
        Species::Neon,
        Species::Portable,
    ];

    /// The widest species the running CPU supports.
    pub fn preferred() -> Self {
        *PREFERRED
    }

    /// The widest species usable with `features`.
    pub fn best_for(features: CpuFeatures) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.supported_by(features))
            .unwrap_or(Species::Portable)
    }

    /// Number of `i32` lanes per vector.
    pub const fn lane_width(self) -> usize {
        match self {
            Species::Avx512 => 16,
            Species::Avx2 => 8,
            Species::Sse2 | Species::Neon | Species::Portable => 4,
        }
    }

    /// Lowercase name, as used in config files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Species::Avx512 => "avx512",
            Species::Avx2 => "avx2",
            Species::Sse2 => "sse2",
            Species::Neon => "neon",
            Species::Portable => "portable",
        }
    }

    /// Whether this species can run on the current CPU.
    pub fn is_supported(self) -> bool {
        self.supported_by(CpuFeatures::current())
    }

    /// Whether this species can run on a CPU with `features`.
    ///
    /// Architecture matters as well as the feature bits: the x86 species are
    /// only compiled on x86_64 and NEON only on aarch64.
    pub fn supported_by(self, features: CpuFeatures) -> bool {
        match self {
            Species::Avx512 => {
                cfg!(target_arch = "x86_64") && features.contains(CpuFeatures::AVX512F)
            }
            Species::Avx2 => {
                cfg!(target_arch = "x86_64") && features.contains(CpuFeatures::AVX2)
            }
            Species::Sse2 => {
                cfg!(target_arch = "x86_64") && features.contains(CpuFeatures::SSE2)
            }
            Species::Neon => {
                cfg!(target_arch = "aarch64") && features.contains(CpuFeatures::NEON)
            }
            Species::Portable => true,
        }
    }

    /// Species supported on the current CPU, widest first.
    pub fn supported() -> Vec<Species> {
        Self::ALL.into_iter().filter(|s| s.is_supported()).collect()
    }

    /// Runs the block loop of this species' backend. See
    /// [`Backend::reverse_blocks`](crate::backend::Backend::reverse_blocks).
    ///
    /// Callers only hold supported species (the `VectorReverser`
    /// constructors check). An unsupported species still runs the portable
    /// backend in release builds rather than executing foreign instructions.
    pub(crate) fn reverse_blocks(self, input: &[i32], output: &mut [i32]) -> usize {
        debug_assert!(
            self.is_supported(),
            "species {} dispatched on a CPU without it",
            self
        );
        match self {
            #[cfg(target_arch = "x86_64")]
            Species::Avx512 => dispatch::<crate::backends::x86::Avx512>(input, output),
            #[cfg(target_arch = "x86_64")]
            Species::Avx2 => dispatch::<crate::backends::x86::Avx2>(input, output),
            #[cfg(target_arch = "x86_64")]
            Species::Sse2 => dispatch::<crate::backends::x86::Sse2>(input, output),
            #[cfg(target_arch = "aarch64")]
            Species::Neon => dispatch::<crate::backends::arm::Neon>(input, output),
            _ => dispatch::<Portable>(input, output),
        }
    }
}

/// Runs `B` if the CPU supports its species, the portable backend otherwise.
fn dispatch<B: Backend>(input: &[i32], output: &mut [i32]) -> usize {
    if B::SPECIES.is_supported() {
        unsafe { B::reverse_blocks(input, output) }
    } else {
        unsafe { Portable::reverse_blocks(input, output) }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Species {
    type Err = ReverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|species| species.name() == lower)
            .ok_or_else(|| ReverseError::UnknownSpecies(s.to_string()))
    }
}
