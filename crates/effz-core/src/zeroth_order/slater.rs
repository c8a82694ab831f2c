//! Two-electron radial integrals of hydrogenic densities, in closed form.
//!
//! The piecewise multipole kernel `r<^k / r>^(k+1)` splits the inner
//! integral at the outer radius; both pieces are incomplete integrals of
//! `s^p exp(-c s)` whose constant and polynomial-times-exponential parts
//! are carried exactly, so the direct (`F^k`) and exchange (`G^k`) integrals
//! come out as exact rationals in atomic units at `z = 1`.

use crate::domain::QuantumNumberError;
use crate::symbolic::{Polynomial, Rational, factorial};
use crate::zeroth_order::radial::RadialWavefunction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlaterError {
    #[error(transparent)]
    QuantumNumbers(#[from] QuantumNumberError),
    #[error("multipole order k={k} has no closed form for the given orbitals")]
    UnsupportedMultipole { k: i32 },
}

/// Direct Slater integral `F^k(nl, n1l1)`.
pub fn i_direct(n: i32, l: i32, n1: i32, l1: i32, k: i32) -> Result<Rational, SlaterError> {
    let outer = RadialWavefunction::new(n, l)?.density();
    let inner = RadialWavefunction::new(n1, l1)?.density();
    if k < 0 {
        return Err(SlaterError::UnsupportedMultipole { k });
    }
    multipole_kernel(&outer.poly, outer.decay, &inner.poly, inner.decay, k)
        .ok_or(SlaterError::UnsupportedMultipole { k })
}

/// Exchange Slater integral `G^k(nl, n1l1)`.
pub fn i_exchange(n: i32, l: i32, n1: i32, l1: i32, k: i32) -> Result<Rational, SlaterError> {
    let first = RadialWavefunction::new(n, l)?;
    let second = RadialWavefunction::new(n1, l1)?;
    if k < 0 {
        return Err(SlaterError::UnsupportedMultipole { k });
    }
    let cross = first
        .amplitude_polynomial()
        .mul(&second.amplitude_polynomial());
    let decay = Rational::new(1, n as i128) + Rational::new(1, n1 as i128);
    let scale = first.normalization_squared() * second.normalization_squared();
    multipole_kernel(&cross, decay, &cross, decay, k)
        .map(|value| value * scale)
        .ok_or(SlaterError::UnsupportedMultipole { k })
}

/// `int_0^inf dr P(r) e^(-alpha r) r^2 [ r^(-k-1) int_0^r s^(k+2) S(s) e^(-beta s) ds
///  + r^k int_r^inf s^(1-k) S(s) e^(-beta s) ds ]`
fn multipole_kernel(
    outer: &Polynomial,
    alpha: Rational,
    inner: &Polynomial,
    beta: Rational,
    k: i32,
) -> Option<Rational> {
    // lower piece: constant part and the polynomial riding on e^(-beta r)
    let mut lower_constant = Rational::zero();
    let mut lower_tail = Polynomial::zero();
    for (degree, coefficient) in inner.terms() {
        let power = degree + k as usize + 2;
        lower_constant += coefficient
            * Rational::from_integer(factorial(power as u32))
            * beta.pow(-(power as i32) - 1);
        lower_tail = lower_tail.add(&tail_polynomial(power, beta).scale(coefficient));
    }

    // upper piece: pure polynomial on e^(-beta r); requires every power of
    // s^(1-k) S(s) to stay nonnegative
    let mut upper_tail = Polynomial::zero();
    for (degree, coefficient) in inner.terms() {
        let power = degree as i32 + 1 - k;
        if power < 0 {
            return None;
        }
        upper_tail = upper_tail.add(&tail_polynomial(power as usize, beta).scale(coefficient));
    }

    let near_weight = outer.mul_xpow(1 - k)?;
    let far_weight = outer.mul_xpow(2 + k)?;

    let direct_part = lower_constant * complete_integral(&near_weight, alpha);
    let lower_correction = complete_integral(&near_weight.mul(&lower_tail), alpha + beta);
    let upper_part = complete_integral(&far_weight.mul(&upper_tail), alpha + beta);
    Some(direct_part - lower_correction + upper_part)
}

/// `int_r^inf s^p e^(-c s) ds = e^(-c r) * tail_polynomial(p, c)(r)`.
fn tail_polynomial(power: usize, c: Rational) -> Polynomial {
    let p_factorial = factorial(power as u32);
    Polynomial::new(
        (0..=power)
            .map(|term| {
                Rational::new(p_factorial, factorial(term as u32))
                    * c.pow(-((power - term) as i32) - 1)
            })
            .collect(),
    )
}

/// `int_0^inf P(r) e^(-c r) dr` for a polynomial `P`.
fn complete_integral(polynomial: &Polynomial, c: Rational) -> Rational {
    let mut total = Rational::zero();
    for (degree, coefficient) in polynomial.terms() {
        total += coefficient
            * Rational::from_integer(factorial(degree as u32))
            * c.pow(-(degree as i32) - 1);
    }
    total
}
