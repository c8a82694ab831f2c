//! Exact symbolic kernel: rationals, polynomials, and canonicalized
//! expression trees. Everything the derivation pipeline manipulates lives
//! here; no arithmetic in this module is approximate except the explicit
//! `f64` evaluation helpers.

pub mod expr;
pub mod polynomial;
pub mod rational;

pub use expr::{EvalError, Expr};
pub use polynomial::{GaussPolynomial, Polynomial, complex_binomial_power};
pub use rational::{GaussRational, Rational, binomial, factorial, gcd};
