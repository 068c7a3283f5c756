//! Lane permutation tables.
//!
//! A `LaneShuffle<W>` maps destination lane `i` to source lane `map[i]`.
//! The reversal tables are built at compile time and shared read-only by
//! every caller.

/// Reversal table for 4-lane vectors (SSE2, NEON, portable).
pub static REVERSE_4: LaneShuffle<4> = LaneShuffle::reversal();

/// Reversal table for 8-lane vectors (AVX2).
pub static REVERSE_8: LaneShuffle<8> = LaneShuffle::reversal();

/// Reversal table for 16-lane vectors (AVX-512).
pub static REVERSE_16: LaneShuffle<16> = LaneShuffle::reversal();

/// A fixed permutation of `W` lanes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaneShuffle<const W: usize> {
    map: [i32; W],
}

impl<const W: usize> LaneShuffle<W> {
    /// The lane reversal `P[i] = W - 1 - i`.
    pub const fn reversal() -> Self {
        let mut map = [0i32; W];
        let mut i = 0;
        while i < W {
            map[i] = (W - 1 - i) as i32;
            i += 1;
        }
        Self { map }
    }

    /// Builds a table from an index function.
    ///
    /// Returns `None` if `op` does not produce a permutation of `0..W`.
    pub fn from_op(op: impl Fn(usize) -> usize) -> Option<Self> {
        let mut map = [0i32; W];
        let mut seen = [false; W];
        for (dst, slot) in map.iter_mut().enumerate() {
            let src = op(dst);
            if src >= W || seen[src] {
                return None;
            }
            seen[src] = true;
            *slot = src as i32;
        }
        Some(Self { map })
    }

    /// Source lane indices, in the form the permute intrinsics take.
    #[inline(always)]
    pub const fn indices(&self) -> &[i32; W] {
        &self.map
    }

    /// Applies the permutation to one block of lanes.
    #[inline(always)]
    pub fn apply(&self, lanes: [i32; W]) -> [i32; W] {
        let mut out = [0i32; W];
        for (dst, &src) in out.iter_mut().zip(self.map.iter()) {
            *dst = lanes[src as usize];
        }
        out
    }
}
