//! Exact squared spherical harmonics.
//!
//! `|Y_l^m|^2` depends only on the polar angle and is an even polynomial in
//! `u = cos(theta)`. The polynomial is computed from the Legendre recurrence
//! in rational arithmetic, which is what lets the downstream plane-wave
//! integral stay exact.

use crate::domain::QuantumNumberError;
use crate::symbolic::{Polynomial, Rational, factorial};

/// `Q_lm(u)` with `|Y_l^m(theta, phi)|^2 = Q_lm(cos(theta)) / (4*pi)`.
///
/// `integral_{-1}^{1} Q_lm(u) du = 2` for every valid `(l, m)`.
pub fn angular_density_polynomial(l: i32, m: i32) -> Result<Polynomial, QuantumNumberError> {
    if l < 0 {
        return Err(QuantumNumberError::DegreeOutOfRange { l });
    }
    if m.abs() > l {
        return Err(QuantumNumberError::MagneticOutOfRange { l, m });
    }
    let order = m.unsigned_abs();

    let mut associated = legendre_polynomial(l as u32);
    for _ in 0..order {
        associated = associated.derivative();
    }

    // (1 - u^2)^|m| from the |m|/2 power of the associated Legendre
    // definition, squared.
    let mut envelope = Polynomial::one();
    let one_minus_u_squared = Polynomial::new(vec![
        Rational::one(),
        Rational::zero(),
        Rational::from_integer(-1),
    ]);
    for _ in 0..order {
        envelope = envelope.mul(&one_minus_u_squared);
    }

    let normalization = Rational::new(
        (2 * l as i128 + 1) * factorial(l as u32 - order),
        factorial(l as u32 + order),
    );
    Ok(associated.square().mul(&envelope).scale(normalization))
}

fn legendre_polynomial(degree: u32) -> Polynomial {
    let mut previous = Polynomial::one();
    if degree == 0 {
        return previous;
    }
    let mut current = Polynomial::monomial(Rational::one(), 1);
    for next_degree in 2..=degree as i128 {
        let lifted = current
            .mul(&Polynomial::monomial(Rational::one(), 1))
            .scale(Rational::new(2 * next_degree - 1, next_degree));
        let lowered = previous.scale(Rational::new(next_degree - 1, next_degree));
        let next = lifted.sub(&lowered);
        previous = current;
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::{angular_density_polynomial, legendre_polynomial};
    use crate::common::constants::PI;
    use crate::numerics::spherical_harmonic_norm_sqr;
    use crate::symbolic::{Polynomial, Rational};

    #[test]
    fn legendre_polynomials_match_tabulated_forms() {
        assert_eq!(legendre_polynomial(0), Polynomial::one());
        assert_eq!(
            legendre_polynomial(2),
            Polynomial::new(vec![
                Rational::new(-1, 2),
                Rational::zero(),
                Rational::new(3, 2),
            ]),
        );
        assert_eq!(
            legendre_polynomial(3),
            Polynomial::new(vec![
                Rational::zero(),
                Rational::new(-3, 2),
                Rational::zero(),
                Rational::new(5, 2),
            ]),
        );
    }

    #[test]
    fn low_order_angular_densities_match_closed_forms() {
        assert_eq!(
            angular_density_polynomial(0, 0).expect("valid"),
            Polynomial::one(),
        );
        // 3 u^2
        assert_eq!(
            angular_density_polynomial(1, 0).expect("valid"),
            Polynomial::monomial(Rational::from_integer(3), 2),
        );
        // (3/2) (1 - u^2)
        assert_eq!(
            angular_density_polynomial(1, 1).expect("valid"),
            Polynomial::new(vec![
                Rational::new(3, 2),
                Rational::zero(),
                Rational::new(-3, 2),
            ]),
        );
    }

    #[test]
    fn angular_densities_are_even_and_normalized() {
        for l in 0..=6 {
            for m in -l..=l {
                let density = angular_density_polynomial(l, m).expect("valid");
                for (degree, _) in density.terms() {
                    assert!(
                        degree % 2 == 0,
                        "odd power {degree} in |Y|^2 for l={l} m={m}",
                    );
                }
                assert_eq!(
                    density.integral_over_symmetric_unit(),
                    Rational::from_integer(2),
                    "normalization failed for l={l} m={m}",
                );
            }
        }
    }

    #[test]
    fn exact_polynomials_agree_with_numeric_harmonics() {
        for l in 0..=4 {
            for m in -l..=l {
                let density = angular_density_polynomial(l, m).expect("valid");
                for theta in [0.2f64, 1.0, 2.4] {
                    let exact = density.eval_f64(theta.cos()) / (4.0 * PI);
                    let numeric = spherical_harmonic_norm_sqr(l, m, theta);
                    assert!(
                        (exact - numeric).abs() <= 1.0e-12,
                        "mismatch for l={l} m={m} theta={theta}",
                    );
                }
            }
        }
    }

    #[test]
    fn invalid_orders_are_rejected() {
        assert!(angular_density_polynomial(-1, 0).is_err());
        assert!(angular_density_polynomial(1, 2).is_err());
    }
}
