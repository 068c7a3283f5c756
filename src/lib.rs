//! # lanerev
//!
//! Reverses `i32` arrays with SIMD lane shuffles.
//!
//! The input is walked in blocks of `W` lanes (the vector width of the
//! selected [`Species`]). Each block is loaded, its lanes reversed with one
//! shuffle, and stored at the mirrored block offset of the output. Leftover
//! elements are handled according to the [`RemainderPolicy`].
//!
//! ```
//! let out = lanerev::reverse(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
//! assert_eq!(out, vec![9, 8, 7, 6, 5, 4, 3, 2, 1]);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod backend;
pub mod backends;
pub mod config;
pub mod error;
pub mod reverser;
pub mod shuffle;
pub mod species;

pub use config::{ReverserConfig, CONFIG};
pub use error::ReverseError;
pub use reverser::{reverse, scalar_reverse, RemainderPolicy, VectorReverser};
pub use species::{CpuFeatures, Species};
