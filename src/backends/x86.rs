//! x86_64 backends.

use crate::backend::{reverse_full_blocks, Backend, LaneBatch};
use crate::shuffle::{REVERSE_16, REVERSE_8};
use crate::species::Species;
use core::arch::x86_64::*;
use core::fmt::{Debug, Formatter};

// ============================================================================
// SSE2 Backend
// ============================================================================

/// SSE2 Backend (4 lanes).
#[derive(Copy, Clone, Debug, Default)]
pub struct Sse2;

impl Backend for Sse2 {
    const LANES: usize = 4;
    const SPECIES: Species = Species::Sse2;
    type Batch = I32x4;

    #[inline]
    unsafe fn reverse_blocks(input: &[i32], output: &mut [i32]) -> usize {
        unsafe { reverse_blocks_sse2(input, output) }
    }
}

#[target_feature(enable = "sse2")]
unsafe fn reverse_blocks_sse2(input: &[i32], output: &mut [i32]) -> usize {
    unsafe { reverse_full_blocks::<<Sse2 as Backend>::Batch>(input, output) }
}

/// 4-lane i32 SIMD vector for SSE2.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x4(__m128i);

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
        unsafe { Self(_mm_loadu_si128(slice.as_ptr() as *const __m128i)) }
    }

    #[inline(always)]
    unsafe fn reverse_lanes(self) -> Self {
        // pshufd with lane selectors (3, 2, 1, 0).
        unsafe { Self(_mm_shuffle_epi32::<0x1B>(self.0)) }
    }

    #[inline(always)]
    unsafe fn store(self, slice: &mut [i32]) {
        assert!(slice.len() >= Self::LANES);
        unsafe { _mm_storeu_si128(slice.as_mut_ptr() as *mut __m128i, self.0) }
    }
}

// ============================================================================
// AVX2 Backend
// ============================================================================

/// AVX2 Backend (8 lanes).
#[derive(Copy, Clone, Debug, Default)]
pub struct Avx2;

impl Backend for Avx2 {
    const LANES: usize = 8;
    const SPECIES: Species = Species::Avx2;
    type Batch = I32x8;

    #[inline]
    unsafe fn reverse_blocks(input: &[i32], output: &mut [i32]) -> usize {
        unsafe { reverse_blocks_avx2(input, output) }
    }
}

#[target_feature(enable = "avx2")]
unsafe fn reverse_blocks_avx2(input: &[i32], output: &mut [i32]) -> usize {
    unsafe { reverse_full_blocks::<<Avx2 as Backend>::Batch>(input, output) }
}

/// 8-lane i32 SIMD vector for AVX2.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x8(__m256i);

impl I32x8 {
    /// Copies the lanes out.
    #[inline(always)]
    pub fn to_array(self) -> [i32; 8] {
        unsafe { core::mem::transmute(self.0) }
    }
}

impl Debug for I32x8 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "I32x8({:?})", self.to_array())
    }
}

impl LaneBatch for I32x8 {
    const LANES: usize = 8;

    #[inline(always)]
    unsafe fn load(slice: &[i32]) -> Self {
        assert!(slice.len() >= Self::LANES);
        unsafe { Self(_mm256_loadu_si256(slice.as_ptr() as *const __m256i)) }
    }

    #[inline(always)]
    unsafe fn reverse_lanes(self) -> Self {
        // vpermd crosses the 128-bit halves, pshufd alone cannot.
        unsafe {
            let idx = _mm256_loadu_si256(REVERSE_8.indices().as_ptr() as *const __m256i);
            Self(_mm256_permutevar8x32_epi32(self.0, idx))
        }
    }

    #[inline(always)]
    unsafe fn store(self, slice: &mut [i32]) {
        assert!(slice.len() >= Self::LANES);
        unsafe { _mm256_storeu_si256(slice.as_mut_ptr() as *mut __m256i, self.0) }
    }
}

// ============================================================================
// AVX-512 Backend
// ============================================================================

/// AVX512 Backend (16 lanes).
#[derive(Copy, Clone, Debug, Default)]
pub struct Avx512;

impl Backend for Avx512 {
    const LANES: usize = 16;
    const SPECIES: Species = Species::Avx512;
    type Batch = I32x16;

    #[inline]
    unsafe fn reverse_blocks(input: &[i32], output: &mut [i32]) -> usize {
        unsafe { reverse_blocks_avx512(input, output) }
    }
}

#[target_feature(enable = "avx512f")]
unsafe fn reverse_blocks_avx512(input: &[i32], output: &mut [i32]) -> usize {
    unsafe { reverse_full_blocks::<<Avx512 as Backend>::Batch>(input, output) }
}

/// 16-lane i32 SIMD vector for AVX-512.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x16(__m512i);

impl I32x16 {
    /// Copies the lanes out.
    #[inline(always)]
    pub fn to_array(self) -> [i32; 16] {
        unsafe { core::mem::transmute(self.0) }
    }
}

impl Debug for I32x16 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "I32x16({:?})", self.to_array())
    }
}

impl LaneBatch for I32x16 {
    const LANES: usize = 16;

    #[inline(always)]
    unsafe fn load(slice: &[i32]) -> Self {
        assert!(slice.len() >= Self::LANES);
        unsafe { Self(_mm512_loadu_si512(slice.as_ptr() as *const _)) }
    }

    #[inline(always)]
    unsafe fn reverse_lanes(self) -> Self {
        // vpermd zmm: index vector first, data second.
        unsafe {
            let idx = _mm512_loadu_si512(REVERSE_16.indices().as_ptr() as *const _);
            Self(_mm512_permutexvar_epi32(idx, self.0))
        }
    }

    #[inline(always)]
    unsafe fn store(self, slice: &mut [i32]) {
        assert!(slice.len() >= Self::LANES);
        unsafe { _mm512_storeu_si512(slice.as_mut_ptr() as *mut _, self.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse2_reverses_one_block() {
        let input = [1, 2, 3, 4];
        let mut out = [0; 4];
        unsafe {
            let v = I32x4::load(&input);
            assert_eq!(v.to_array()[0], 1);
            v.reverse_lanes().store(&mut out);
        }
        assert_eq!(out, [4, 3, 2, 1]);
    }

    #[test]
    fn sse2_store_stays_in_bounds() {
        const GUARD: i32 = 0x5A5A_5A5A;
        let mut buffer = [GUARD; 8];
        unsafe { I32x4::load(&[7, 7, 7, 7]).store(&mut buffer) };
        assert_eq!(&buffer[..4], &[7; 4]);
        assert_eq!(&buffer[4..], &[GUARD; 4], "SSE2 store overran its 4 lanes");
    }

    #[test]
    #[should_panic]
    fn sse2_load_rejects_short_slice() {
        let _ = unsafe { I32x4::load(&[1, 2, 3]) };
    }

    #[test]
    fn sse2_blocks_leave_tail_slots_alone() {
        let input = [1, 2, 3, 4, 5, 6];
        let mut out = [0; 6];
        let consumed = unsafe { Sse2::reverse_blocks(&input, &mut out) };
        assert_eq!(consumed, 4);
        // Block [1,2,3,4] mirrored into the last four slots.
        assert_eq!(out, [0, 0, 4, 3, 2, 1]);
    }

    #[test]
    fn lanes_agree_with_species() {
        assert_eq!(Sse2::SPECIES.lane_width(), Sse2::LANES);
        assert_eq!(Avx2::SPECIES.lane_width(), Avx2::LANES);
        assert_eq!(Avx512::SPECIES.lane_width(), Avx512::LANES);
        assert_eq!(<Avx512 as Backend>::Batch::LANES, Avx512::LANES);
    }

    #[test]
    fn avx512_reverses_across_all_lanes() {
        if !is_x86_feature_detected!("avx512f") {
            return;
        }
        let input: [i32; 16] = core::array::from_fn(|i| i as i32 + 1);
        let mut out = [0; 16];
        let consumed = unsafe { Avx512::reverse_blocks(&input, &mut out) };
        assert_eq!(consumed, 16);
        let expected: [i32; 16] = core::array::from_fn(|i| 16 - i as i32);
        assert_eq!(out, expected);
    }

    #[test]
    fn avx512_store_stays_in_bounds() {
        if !is_x86_feature_detected!("avx512f") {
            return;
        }
        const GUARD: i32 = -1;
        let mut buffer = [GUARD; 20];
        let input: [i32; 16] = core::array::from_fn(|i| i as i32);
        unsafe { reverse_blocks_avx512(&input, &mut buffer[2..18]) };
        assert_eq!(&buffer[..2], &[GUARD; 2]);
        assert_eq!(buffer[2], 15);
        assert_eq!(buffer[17], 0);
        assert_eq!(&buffer[18..], &[GUARD; 2], "AVX-512 store overran its 16 lanes");
    }

    #[test]
    fn avx2_reverses_one_block() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }
        let input = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut out = [0; 8];
        unsafe { Avx2::reverse_blocks(&input, &mut out) };
        assert_eq!(out, [8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn avx2_store_stays_in_bounds() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }
        const GUARD: i32 = -1;
        let mut buffer = [GUARD; 12];
        let input: [i32; 8] = core::array::from_fn(|i| i as i32);
        unsafe { reverse_blocks_avx2(&input, &mut buffer[2..10]) };
        assert_eq!(&buffer[..2], &[GUARD; 2]);
        assert_eq!(&buffer[2..10], &[7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(&buffer[10..], &[GUARD; 2], "AVX2 store overran its 8 lanes");
    }
}
