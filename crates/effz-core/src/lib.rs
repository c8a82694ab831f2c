//! Symbolic atomic scattering factors and zeroth-order effective charges
//! for hydrogen-like configurations.
//!
//! The derivation pipeline runs in exact arithmetic: radial wavefunctions
//! and squared spherical harmonics are carried as rational polynomials, the
//! plane-wave Fourier transform closes to a rational function of momentum
//! transfer, and results are rendered as canonicalized expression trees.

pub mod atomic_data;
pub mod common;
pub mod domain;
pub mod input;
pub mod numerics;
pub mod report;
pub mod symbolic;
pub mod zeroth_order;

pub use domain::{OccNum, OccNums, QuantumNumberError};
pub use report::{Calculation, Report, ReportBatch, ReportError, parse_and_compute};
pub use symbolic::Expr;
pub use zeroth_order::{asf_h_l, h_l_rnl, rho_h_l, rho_h_l_fourier, rho_h_l_p};
