//! Floating-point special functions backing the numeric evaluation paths.

pub mod harmonics;
pub mod wigner;

pub use harmonics::{spherical_harmonic, spherical_harmonic_norm_sqr};
pub use wigner::wigner_3j;
