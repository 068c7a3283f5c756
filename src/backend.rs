//! Backend trait and lane batch operations.

use crate::species::Species;
use core::fmt::Debug;

/// A backend provides the SIMD implementation of the block reversal.
pub trait Backend: 'static + Copy + Clone + Send + Sync + Debug {
    /// Number of `i32` lanes in the SIMD vector.
    const LANES: usize;
    /// The species this backend implements.
    const SPECIES: Species;

    /// The SIMD vector type.
    type Batch: LaneBatch;

    /// Reverses every full `LANES`-wide block of `input` into its mirrored
    /// position in `output` and returns how many leading input elements were
    /// consumed (`input.len() - input.len() % LANES`).
    ///
    /// The trailing `input.len() % LANES` elements are not touched; output
    /// positions `[0, input.len() % LANES)` are left as they were.
    ///
    /// # Safety
    ///
    /// The running CPU must support this backend's target features.
    ///
    /// # Panics
    ///
    /// If `output.len() != input.len()`.
    unsafe fn reverse_blocks(input: &[i32], output: &mut [i32]) -> usize;
}

/// Storage and lane movement for one vector of `i32` lanes.
///
/// `load` and `store` touch exactly `LANES` elements. Longer slices are
/// allowed, the extra elements are neither read nor written.
pub trait LaneBatch: Copy + Clone + Debug + Send + Sync {
    /// Number of lanes in this vector.
    const LANES: usize;

    /// Loads the first `LANES` elements of `slice`.
    ///
    /// # Safety
    ///
    /// The running CPU must support the backend's target features.
    ///
    /// # Panics
    ///
    /// If `slice.len() < LANES`.
    unsafe fn load(slice: &[i32]) -> Self;

    /// Reverses the lane order: lane `i` receives lane `LANES - 1 - i`.
    ///
    /// # Safety
    ///
    /// The running CPU must support the backend's target features.
    unsafe fn reverse_lanes(self) -> Self;

    /// Stores the vector into the first `LANES` elements of `slice`.
    ///
    /// # Safety
    ///
    /// The running CPU must support the backend's target features.
    ///
    /// # Panics
    ///
    /// If `slice.len() < LANES`.
    unsafe fn store(self, slice: &mut [i32]);
}

/// The block loop shared by every backend.
///
/// Each backend calls this from a function compiled with its target
/// features so the batch operations inline into vector instructions.
///
/// # Safety
///
/// The running CPU must support the target features of `B`.
#[inline(always)]
pub(crate) unsafe fn reverse_full_blocks<B: LaneBatch>(input: &[i32], output: &mut [i32]) -> usize {
    assert_eq!(
        input.len(),
        output.len(),
        "reverse_full_blocks: output length must equal input length"
    );

    let n = input.len();
    let w = B::LANES;
    let full = n - n % w;

    let mut i = 0;
    while i < full {
        // Block [i, i+w) lands mirrored at [n-i-w, n-i).
        unsafe {
            let block = B::load(&input[i..i + w]);
            let flipped = block.reverse_lanes();
            flipped.store(&mut output[n - i - w..n - i]);
        }
        i += w;
    }

    full
}
