//! ARM NEON backend (4 lanes for i32).

use crate::backend::{reverse_full_blocks, Backend, LaneBatch};
use crate::species::Species;
use core::arch::aarch64::*;
use core::fmt::{Debug, Formatter};

/// NEON Backend (4 lanes).
#[derive(Copy, Clone, Debug, Default)]
pub struct Neon;

impl Backend for Neon {
    const LANES: usize = 4;
    const SPECIES: Species = Species::Neon;
    type Batch = I32x4;

    #[inline]
    unsafe fn reverse_blocks(input: &[i32], output: &mut [i32]) -> usize {
        unsafe { reverse_blocks_neon(input, output) }
    }
}

#[target_feature(enable = "neon")]
unsafe fn reverse_blocks_neon(input: &[i32], output: &mut [i32]) -> usize {
    unsafe { reverse_full_blocks::<<Neon as Backend>::Batch>(input, output) }
}

/// 4-lane i32 SIMD vector for ARM NEON.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x4(int32x4_t);

impl I32x4 {
    /// Copies the lanes out.
    #[inline(always)]
    pub fn to_array(self) -> [i32; 4] {
        unsafe { core::mem::transmute(self.0) }
    }
}

impl Debug for I32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "I32x4({:?})", self.to_array())
    }
}

impl LaneBatch for I32x4 {
    const LANES: usize = 4;

    #[inline(always)]
    unsafe fn load(slice: &[i32]) -> Self {
        assert!(slice.len() >= Self::LANES);
        unsafe { Self(vld1q_s32(slice.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn reverse_lanes(self) -> Self {
        unsafe {
            // [a, b, c, d] -> [b, a, d, c] -> [d, c, b, a]
            let pairs = vrev64q_s32(self.0);
            Self(vextq_s32::<2>(pairs, pairs))
        }
    }

    #[inline(always)]
    unsafe fn store(self, slice: &mut [i32]) {
        assert!(slice.len() >= Self::LANES);
        unsafe { vst1q_s32(slice.as_mut_ptr(), self.0) }
    }
}
