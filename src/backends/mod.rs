//! Platform-specific SIMD backends.
//!
//! Each backend implements the `Backend` trait using platform intrinsics.
//! The portable backend is always compiled and serves every other target.

#[cfg(target_arch = "x86_64")]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub mod arm;

pub mod portable;
