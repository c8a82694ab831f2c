//! Atomic scattering factors: the Fourier transform of a configuration
//! density with respect to momentum transfer.
//!
//! The triple integral
//! `int r^2 rho(r,theta) exp(i*q*r*cos(theta)) sin(theta) dphi dtheta dr`
//! closes exactly for this crate's densities. Integrating the radial part
//! first gives `(2+d)!/(a - i*q*u)^(3+d)` per radial monomial; the polar
//! integral of `u^k` against that kernel is evaluated through the
//! substitution `w = a - i*q*u` in Gaussian rational arithmetic. Because the
//! angular density has degree at most `2l` while every radial power is at
//! least `2l`, no logarithmic antiderivative ever appears and each orbital
//! contributes a rational function of `v = q/z` with denominator a power of
//! `(a^2 + v^2)`, `a = 2/n`.

use crate::common::constants::BOHR;
use crate::domain::{OccNum, QuantumNumberError};
use crate::symbolic::{
    Expr, GaussPolynomial, GaussRational, Polynomial, Rational, binomial, complex_binomial_power,
    factorial, gcd,
};
use crate::zeroth_order::angular::angular_density_polynomial;
use crate::zeroth_order::radial::RadialWavefunction;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScatteringError {
    #[error(transparent)]
    QuantumNumbers(#[from] QuantumNumberError),
    #[error("plane-wave integral left a residual imaginary part for orbital n={n} l={l} m={m}")]
    ImaginaryResidue { n: i32, l: i32, m: i32 },
    #[error("plane-wave integral left an unexpected pole at q=0 for orbital n={n} l={l} m={m}")]
    LowOrderResidue { n: i32, l: i32, m: i32 },
}

/// Exact form factor of a configuration as a rational function of
/// `v = q/z`, with the denominator kept in factored form: one factor
/// `(4/n^2 + v^2)^power` per occupied shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFactor {
    numerator: Polynomial,
    factors: BTreeMap<i32, u32>,
}

impl FormFactor {
    /// Form factor of a single orbital; normalized so the forward value is
    /// exactly one.
    pub fn for_orbital(n: i32, l: i32, m: i32) -> Result<Self, ScatteringError> {
        let radial = RadialWavefunction::new(n, l)?.density();
        let angular = angular_density_polynomial(l, m)?;
        let decay = radial.decay;

        let highest_radial_power = radial
            .poly
            .degree()
            .expect("radial density is never the zero polynomial");
        let denominator_power = highest_radial_power as u32 + 2;
        let shell_factor = shell_factor_polynomial(decay);
        let shell_factor_gauss = gauss_of(&shell_factor);

        let mut numerator = GaussPolynomial::zero();
        for (cosine_power, angular_coefficient) in angular.terms() {
            for (radial_power, radial_coefficient) in radial.poly.terms() {
                debug_assert!(cosine_power <= radial_power);
                let kernel_power = radial_power + 3;

                // polar integral of u^k against (a - i*v*u)^(-M), summed
                // over the binomial expansion of u^k in w = a - i*v*u
                let mut polar = GaussPolynomial::zero();
                for expansion_index in 0..=cosine_power {
                    let tail_power = (kernel_power - 1 - expansion_index) as u32;
                    let bracket = complex_binomial_power(decay, 1, tail_power)
                        .sub(&complex_binomial_power(decay, -1, tail_power));
                    let sign = if expansion_index % 2 == 0 { 1 } else { -1 };
                    let scalar = Rational::from_integer(
                        sign * binomial(cosine_power as u32, expansion_index as u32),
                    ) * decay.pow((cosine_power - expansion_index) as i32)
                        * Rational::new(1, tail_power as i128);
                    polar = polar.add(
                        &bracket
                            .mul(&shell_factor_gauss.pow(expansion_index as u32))
                            .scale(GaussRational::from_rational(scalar)),
                    );
                }
                let polar = polar.scale(GaussRational::i_power(-(cosine_power as i32 + 1)));
                let polar = polar
                    .div_xpow_exact(cosine_power + 1)
                    .ok_or(ScatteringError::LowOrderResidue { n, l, m })?;

                let weight = Rational::new(1, 2)
                    * angular_coefficient
                    * radial_coefficient
                    * Rational::from_integer(factorial(radial_power as u32 + 2));
                let lift = denominator_power - (radial_power as u32 + 2);
                numerator = numerator.add(
                    &polar
                        .mul(&shell_factor_gauss.pow(lift))
                        .scale(GaussRational::from_rational(weight)),
                );
            }
        }

        let numerator = numerator
            .into_rational()
            .ok_or(ScatteringError::ImaginaryResidue { n, l, m })?;
        let mut form_factor = Self {
            numerator,
            factors: BTreeMap::from([(n, denominator_power)]),
        };
        form_factor.reduce();
        Ok(form_factor)
    }

    /// Form factor of a whole configuration: the orbital contributions
    /// brought onto a common factored denominator and reduced.
    pub fn for_configuration(occ_nums: &[OccNum]) -> Result<Self, ScatteringError> {
        let mut orbitals = Vec::with_capacity(occ_nums.len());
        for occ_num in occ_nums {
            occ_num.validate()?;
            orbitals.push(Self::for_orbital(occ_num.n, occ_num.l, occ_num.m)?);
        }

        let mut shared_factors: BTreeMap<i32, u32> = BTreeMap::new();
        for orbital in &orbitals {
            for (shell, power) in &orbital.factors {
                let slot = shared_factors.entry(*shell).or_insert(0);
                *slot = (*slot).max(*power);
            }
        }

        let mut numerator = Polynomial::zero();
        for orbital in &orbitals {
            let mut lifted = orbital.numerator.clone();
            for (shell, shared_power) in &shared_factors {
                let own_power = orbital.factors.get(shell).copied().unwrap_or(0);
                let factor = shell_factor_polynomial(Rational::new(2, *shell as i128));
                for _ in own_power..*shared_power {
                    lifted = lifted.mul(&factor);
                }
            }
            numerator = numerator.add(&lifted);
        }

        let mut form_factor = Self {
            numerator,
            factors: shared_factors,
        };
        form_factor.reduce();
        Ok(form_factor)
    }

    /// Forward-scattering value `f(0)`: exactly the electron count of the
    /// configuration.
    pub fn forward_value(&self) -> Rational {
        let mut value = self.numerator.eval_rational(Rational::zero());
        for (shell, power) in &self.factors {
            value *= Rational::new((*shell as i128).pow(2), 4).pow(*power as i32);
        }
        value
    }

    pub fn eval(&self, q_over_z: f64) -> f64 {
        let mut value = self.numerator.eval_f64(q_over_z);
        for (shell, power) in &self.factors {
            let a = 2.0 / *shell as f64;
            value /= (a * a + q_over_z * q_over_z).powi(*power as i32);
        }
        value
    }

    /// Renders the factored bivariate form `F(z, q)`: an integer-coefficient
    /// numerator in `q` and `z` over shell factors `(4z^2 + n^2 q^2)^power`.
    pub fn expression(&self, z: &Expr, q: &Expr) -> Expr {
        if self.numerator.is_zero() {
            return Expr::zero();
        }
        let denominator_degree: usize = self
            .factors
            .values()
            .map(|power| 2 * *power as usize)
            .sum();
        debug_assert!(
            self.numerator.degree().unwrap_or(0) <= denominator_degree,
            "form factor must vanish at large momentum transfer",
        );

        let mut constant = Rational::one();
        for (shell, power) in &self.factors {
            // (a^2 + v^2) clears to (4 z^2 + n^2 q^2) / n^2; even shells
            // share a further factor of 4 across both terms
            constant *= Rational::new((*shell as i128).pow(2), common_factor(*shell))
                .pow(*power as i32);
        }
        let content = polynomial_content(&self.numerator);
        constant *= content;

        let mut terms = Vec::new();
        for (degree, coefficient) in self.numerator.terms() {
            terms.push(Expr::mul(vec![
                Expr::from_rational(coefficient / content),
                Expr::powi(q.clone(), degree as i128),
                Expr::powi(z.clone(), (denominator_degree - degree) as i128),
            ]));
        }

        let mut parts = vec![Expr::from_rational(constant), Expr::add(terms)];
        for (shell, power) in &self.factors {
            let reduced = common_factor(*shell);
            parts.push(Expr::powi(
                Expr::add(vec![
                    Expr::mul(vec![Expr::rational(4, reduced), Expr::powi(z.clone(), 2)]),
                    Expr::mul(vec![
                        Expr::rational((*shell as i128).pow(2), reduced),
                        Expr::powi(q.clone(), 2),
                    ]),
                ]),
                -(*power as i128),
            ));
        }
        Expr::mul(parts)
    }

    fn reduce(&mut self) {
        let shells: Vec<i32> = self.factors.keys().copied().collect();
        for shell in shells {
            let factor = shell_factor_polynomial(Rational::new(2, shell as i128));
            while self.factors.get(&shell).copied().unwrap_or(0) > 0 {
                match self.numerator.divide_exact(&factor) {
                    Some(quotient) => {
                        self.numerator = quotient;
                        *self.factors.get_mut(&shell).expect("present") -= 1;
                    }
                    None => break,
                }
            }
            if self.factors.get(&shell).copied().unwrap_or(0) == 0 {
                self.factors.remove(&shell);
            }
        }
    }
}

/// Fourier transform of the configuration density with respect to momentum
/// transfer `q`, simplified and factored.
pub fn rho_h_l_fourier(
    z: &Expr,
    occ_nums: &[OccNum],
    q: &Expr,
) -> Result<Expr, ScatteringError> {
    Ok(FormFactor::for_configuration(occ_nums)?.expression(z, q))
}

/// Atomic scattering factor as a function of the scattering parameter `s`:
/// the form factor with `q` replaced by `4*pi*a_bohr*s`.
pub fn asf_h_l(z: &Expr, occ_nums: &[OccNum], s: &Expr) -> Result<Expr, ScatteringError> {
    let momentum_transfer = Expr::mul(vec![
        Expr::integer(4),
        Expr::Pi,
        Expr::float(BOHR),
        s.clone(),
    ]);
    Ok(FormFactor::for_configuration(occ_nums)?.expression(z, &momentum_transfer))
}

/// Shared integer factor of `4 z^2 + n^2 q^2`.
fn common_factor(shell: i32) -> i128 {
    if shell % 2 == 0 { 4 } else { 1 }
}

/// `a^2 + v^2` for shell decay `a`.
fn shell_factor_polynomial(decay: Rational) -> Polynomial {
    Polynomial::new(vec![decay * decay, Rational::zero(), Rational::one()])
}

fn gauss_of(polynomial: &Polynomial) -> GaussPolynomial {
    let degree = match polynomial.degree() {
        Some(degree) => degree,
        None => return GaussPolynomial::zero(),
    };
    GaussPolynomial::new(
        (0..=degree)
            .map(|index| GaussRational::from_rational(polynomial.coefficient(index)))
            .collect(),
    )
}

/// Positive rational content of a polynomial: gcd of numerators over lcm of
/// denominators.
fn polynomial_content(polynomial: &Polynomial) -> Rational {
    let mut numerator_gcd: u128 = 0;
    let mut denominator_lcm: u128 = 1;
    for (_, coefficient) in polynomial.terms() {
        numerator_gcd = gcd(numerator_gcd, coefficient.numerator().unsigned_abs());
        let denominator = coefficient.denominator() as u128;
        denominator_lcm = denominator_lcm / gcd(denominator_lcm, denominator) * denominator;
    }
    if numerator_gcd == 0 {
        return Rational::one();
    }
    Rational::new(numerator_gcd as i128, denominator_lcm as i128)
}

#[cfg(test)]
mod tests {
    use super::{FormFactor, asf_h_l, rho_h_l_fourier};
    use crate::domain::OccNum;
    use crate::symbolic::{Expr, Polynomial, Rational};

    fn occ(n: i32, l: i32, m: i32, ms: i32) -> OccNum {
        OccNum::new(n, l, m, ms).expect("valid occupation numbers")
    }

    #[test]
    fn ground_state_orbital_reproduces_the_textbook_form_factor() {
        let form_factor = FormFactor::for_orbital(1, 0, 0).expect("valid");
        assert_eq!(
            form_factor.numerator,
            Polynomial::constant(Rational::from_integer(16)),
        );
        assert_eq!(form_factor.factors.len(), 1);
        assert_eq!(form_factor.factors.get(&1), Some(&2));

        let z = Expr::symbol("z");
        let q = Expr::symbol("q");
        assert_eq!(
            form_factor.expression(&z, &q).to_string(),
            "16*z^4/(q^2 + 4*z^2)^2",
        );
    }

    #[test]
    fn every_orbital_scatters_exactly_one_electron_forward() {
        for n in 1..=4 {
            for l in 0..n {
                for m in -l..=l {
                    let form_factor = FormFactor::for_orbital(n, l, m).expect("valid");
                    assert_eq!(
                        form_factor.forward_value(),
                        Rational::one(),
                        "forward value wrong for n={n} l={l} m={m}",
                    );
                }
            }
        }
    }

    #[test]
    fn form_factors_decay_at_large_momentum_transfer() {
        for (n, l, m) in [(1, 0, 0), (2, 1, 0), (3, 2, 2), (4, 0, 0)] {
            let form_factor = FormFactor::for_orbital(n, l, m).expect("valid");
            assert!(form_factor.eval(60.0).abs() < 1.0e-3);
            assert!(form_factor.eval(0.0) > 0.99);
        }
    }

    #[test]
    fn magnetic_substates_scatter_differently_off_axis() {
        let aligned = FormFactor::for_orbital(2, 1, 0).expect("valid");
        let transverse = FormFactor::for_orbital(2, 1, 1).expect("valid");
        assert!((aligned.eval(1.0) - transverse.eval(1.0)).abs() > 1.0e-3);
    }

    #[test]
    fn helium_like_configuration_doubles_the_orbital_factor() {
        let configuration = [occ(1, 0, 0, 1), occ(1, 0, 0, -1)];
        let combined = FormFactor::for_configuration(&configuration).expect("valid");
        assert_eq!(
            combined.numerator,
            Polynomial::constant(Rational::from_integer(32)),
        );
        assert_eq!(combined.forward_value(), Rational::from_integer(2));
    }

    #[test]
    fn rational_and_expression_evaluations_agree() {
        let configuration = [
            occ(1, 0, 0, 1),
            occ(1, 0, 0, -1),
            occ(2, 0, 0, 1),
            occ(2, 1, -1, 1),
        ];
        let form_factor = FormFactor::for_configuration(&configuration).expect("valid");
        let z = Expr::symbol("z");
        let q = Expr::symbol("q");
        let expression = form_factor.expression(&z, &q);
        for (z_value, q_value) in [(1.0, 0.7), (2.0, 3.1), (3.0, 0.01)] {
            let from_expression = expression
                .eval(&[("z", z_value), ("q", q_value)])
                .expect("bound");
            let from_rational_function = form_factor.eval(q_value / z_value);
            assert!(
                (from_expression - from_rational_function).abs()
                    <= 1.0e-10 * from_rational_function.abs().max(1.0),
                "mismatch at z={z_value} q={q_value}",
            );
        }
    }

    #[test]
    fn forward_scattering_counts_electrons_through_the_wrapper() {
        let z = Expr::symbol("z");
        let hydrogen = [occ(1, 0, 0, 1)];
        assert_eq!(
            asf_h_l(&z, &hydrogen, &Expr::zero()).expect("valid"),
            Expr::one(),
        );

        let lithium = [occ(1, 0, 0, 1), occ(1, 0, 0, -1), occ(2, 0, 0, 1)];
        assert_eq!(
            asf_h_l(&z, &lithium, &Expr::zero()).expect("valid"),
            Expr::integer(3),
        );
    }

    #[test]
    fn empty_configuration_transforms_to_zero() {
        let z = Expr::symbol("z");
        let q = Expr::symbol("q");
        assert!(rho_h_l_fourier(&z, &[], &q).expect("valid").is_zero());
    }
}
