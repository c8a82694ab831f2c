//! Numeric spherical harmonics for point evaluation of densities.
//!
//! The symbolic pipeline works with exact `|Y_lm|^2` polynomials; this is
//! the floating-point companion used when a density is sampled at a point.

use crate::common::constants::PI;
use num_complex::Complex64;

/// Complex spherical harmonic `Y_l^m(theta, phi)` with the Condon-Shortley
/// phase convention.
pub fn spherical_harmonic(l: i32, m: i32, theta: f64, phi: f64) -> Complex64 {
    assert!(l >= 0, "spherical harmonic requires l >= 0");
    assert!(m.abs() <= l, "spherical harmonic requires |m| <= l");

    if m < 0 {
        let mirrored = spherical_harmonic(l, -m, theta, phi);
        let parity = if m % 2 == 0 { 1.0 } else { -1.0 };
        return parity * mirrored.conj();
    }

    let l = l as u32;
    let m = m as u32;
    let legendre = associated_legendre(l, m, theta.cos());
    let normalization = ((2 * l + 1) as f64 / (4.0 * PI) * inverse_factorial_ratio(l, m)).sqrt();
    Complex64::from_polar(normalization * legendre, m as f64 * phi)
}

/// `|Y_l^m(theta, .)|^2`; the azimuthal phase drops out.
pub fn spherical_harmonic_norm_sqr(l: i32, m: i32, theta: f64) -> f64 {
    spherical_harmonic(l, m, theta, 0.0).norm_sqr()
}

/// Associated Legendre `P_l^m(x)` via the standard stable recurrence,
/// starting from the diagonal `P_m^m` seed.
fn associated_legendre(l: u32, m: u32, x: f64) -> f64 {
    let sine = (1.0 - x * x).max(0.0).sqrt();
    let mut diagonal = 1.0;
    for step in 1..=m {
        diagonal *= -((2 * step - 1) as f64) * sine;
    }
    if l == m {
        return diagonal;
    }

    let mut previous = diagonal;
    let mut current = x * ((2 * m + 1) as f64) * diagonal;
    for degree in (m + 2)..=l {
        let next = (((2 * degree - 1) as f64) * x * current
            - ((degree + m - 1) as f64) * previous)
            / ((degree - m) as f64);
        previous = current;
        current = next;
    }
    current
}

/// `(l-m)! / (l+m)!` evaluated as a running product to avoid overflow.
fn inverse_factorial_ratio(l: u32, m: u32) -> f64 {
    let mut ratio = 1.0;
    for factor in (l - m + 1)..=(l + m) {
        ratio /= factor as f64;
    }
    ratio
}

#[cfg(test)]
mod tests {
    use super::{spherical_harmonic, spherical_harmonic_norm_sqr};
    use crate::common::constants::PI;
    use num_complex::Complex64;

    fn assert_complex_close(label: &str, expected: Complex64, actual: Complex64, tolerance: f64) {
        let difference = (actual - expected).norm();
        assert!(
            difference <= tolerance,
            "{label} expected=({:.15e},{:.15e}) actual=({:.15e},{:.15e}) difference={difference:.3e}",
            expected.re,
            expected.im,
            actual.re,
            actual.im,
        );
    }

    #[test]
    fn low_order_harmonics_match_closed_forms() {
        let theta = PI / 3.0;
        let phi = 0.7;

        assert_complex_close(
            "Y_0^0",
            Complex64::new((1.0 / (4.0 * PI)).sqrt(), 0.0),
            spherical_harmonic(0, 0, theta, phi),
            1.0e-14,
        );
        assert_complex_close(
            "Y_1^0",
            Complex64::new((3.0 / (4.0 * PI)).sqrt() * theta.cos(), 0.0),
            spherical_harmonic(1, 0, theta, phi),
            1.0e-14,
        );
        let expected_y11 =
            -(3.0 / (8.0 * PI)).sqrt() * theta.sin() * Complex64::from_polar(1.0, phi);
        assert_complex_close(
            "Y_1^1",
            expected_y11,
            spherical_harmonic(1, 1, theta, phi),
            1.0e-14,
        );
    }

    #[test]
    fn negative_orders_follow_the_conjugation_rule() {
        let theta = 1.1;
        let phi = -0.4;
        for l in 1..=5 {
            for m in 1..=l {
                let positive = spherical_harmonic(l, m, theta, phi);
                let negative = spherical_harmonic(l, -m, theta, phi);
                let expected = if m % 2 == 0 {
                    positive.conj()
                } else {
                    -positive.conj()
                };
                assert_complex_close(&format!("l={l} m={m}"), expected, negative, 1.0e-13);
            }
        }
    }

    #[test]
    fn norm_squares_satisfy_the_addition_theorem() {
        for l in [0, 1, 2, 4] {
            for theta in [0.3, 1.2, 2.7] {
                let mut total = 0.0;
                for m in -l..=l {
                    total += spherical_harmonic_norm_sqr(l, m, theta);
                }
                let expected = (2 * l + 1) as f64 / (4.0 * PI);
                assert!(
                    (total - expected).abs() <= 1.0e-12,
                    "addition theorem failed for l={l} theta={theta}",
                );
            }
        }
    }
}
