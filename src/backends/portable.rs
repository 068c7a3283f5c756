//! Portable backend (4 lanes, no intrinsics).
//!
//! Runs the same block + mirror loop as the SIMD backends, permuting each
//! block through the shared reversal table with plain scalar moves.

use crate::backend::{reverse_full_blocks, Backend, LaneBatch};
use crate::shuffle::REVERSE_4;
use crate::species::Species;

/// A portable backend with 4 lanes.
#[derive(Copy, Clone, Debug, Default)]
pub struct Portable;

impl Backend for Portable {
    const LANES: usize = 4;
    const SPECIES: Species = Species::Portable;
    type Batch = Lanes4;

    #[inline]
    unsafe fn reverse_blocks(input: &[i32], output: &mut [i32]) -> usize {
        unsafe { reverse_full_blocks::<Self::Batch>(input, output) }
    }
}

/// A block of four `i32` lanes held in an array.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct Lanes4(pub [i32; 4]);

impl LaneBatch for Lanes4 {
    const LANES: usize = 4;

    #[inline(always)]
    unsafe fn load(slice: &[i32]) -> Self {
        let mut lanes = [0i32; 4];
        lanes.copy_from_slice(&slice[..Self::LANES]);
        Lanes4(lanes)
    }

    #[inline(always)]
    unsafe fn reverse_lanes(self) -> Self {
        Lanes4(REVERSE_4.apply(self.0))
    }

    #[inline(always)]
    unsafe fn store(self, slice: &mut [i32]) {
        slice[..Self::LANES].copy_from_slice(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_lanes_through_table() {
        let v = unsafe { Lanes4::load(&[5, 6, 7, 8]).reverse_lanes() };
        assert_eq!(v, Lanes4([8, 7, 6, 5]));
    }

    #[test]
    fn store_stays_in_bounds() {
        let mut buffer = [-1; 6];
        unsafe { Lanes4([1, 2, 3, 4]).store(&mut buffer[1..]) };
        assert_eq!(buffer, [-1, 1, 2, 3, 4, -1]);
    }

    #[test]
    #[should_panic]
    fn load_rejects_short_slice() {
        let _ = unsafe { Lanes4::load(&[1, 2]) };
    }

    #[test]
    fn block_and_lane_reversal_compose() {
        // Mirroring blocks alone would give [5,6,7,8,1,2,3,4].
        let input = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut out = [0; 8];
        let consumed = unsafe { Portable::reverse_blocks(&input, &mut out) };
        assert_eq!(consumed, 8);
        assert_eq!(out, [8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn lanes_agree_with_species() {
        assert_eq!(Portable::SPECIES.lane_width(), Portable::LANES);
        assert_eq!(Lanes4::LANES, Portable::LANES);
    }

    #[test]
    fn empty_input_consumes_nothing() {
        let consumed = unsafe { Portable::reverse_blocks(&[], &mut []) };
        assert_eq!(consumed, 0);
    }
}
