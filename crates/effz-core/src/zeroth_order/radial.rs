//! Hydrogen-like radial wavefunctions in exact closed form.
//!
//! The terminating confluent-hypergeometric series `1F1(-(n-l-1); 2l+2; x)`
//! with `x = 2*z*r/n` is carried as an exact polynomial, so both the
//! symbolic expression and the squared radial density follow from the same
//! data without any floating-point derivation.

use crate::domain::{QuantumNumberError, validate_quantum_numbers};
use crate::symbolic::{Expr, Polynomial, Rational, factorial};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadialWavefunction {
    n: i32,
    l: i32,
    normalization_squared: Rational,
    hyper: Polynomial,
}

/// `|R_nl|^2` at `z = 1`: a polynomial in `r` times `exp(-decay*r)`. The
/// general-`z` density is `z^3 * poly(z*r) * exp(-decay*z*r)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadialDensity {
    pub poly: Polynomial,
    pub decay: Rational,
}

impl RadialWavefunction {
    pub fn new(n: i32, l: i32) -> Result<Self, QuantumNumberError> {
        validate_quantum_numbers(n, l, 0)?;
        let normalization_squared = Rational::new(1, factorial(2 * l as u32 + 1).pow(2))
            * Rational::new(2, n as i128).pow(3)
            * Rational::new(
                factorial((n + l) as u32),
                factorial((n - l - 1) as u32) * 2 * n as i128,
            );
        Ok(Self {
            n,
            l,
            normalization_squared,
            hyper: hypergeometric_series(n, l),
        })
    }

    pub fn principal(&self) -> i32 {
        self.n
    }

    pub fn orbital(&self) -> i32 {
        self.l
    }

    pub fn normalization_squared(&self) -> Rational {
        self.normalization_squared
    }

    /// `x^l * 1F1(...)` expanded in powers of `r` at `z = 1`, without the
    /// normalization factor.
    pub fn amplitude_polynomial(&self) -> Polynomial {
        let x_scale = Rational::new(2, self.n as i128);
        let mut coefficients = vec![Rational::zero(); self.l as usize];
        for (degree, coefficient) in self.hyper.terms() {
            let total_degree = self.l as usize + degree;
            while coefficients.len() <= total_degree {
                coefficients.push(Rational::zero());
            }
            coefficients[total_degree] = coefficient * x_scale.pow(total_degree as i32);
        }
        Polynomial::new(coefficients)
    }

    pub fn density(&self) -> RadialDensity {
        RadialDensity {
            poly: self
                .amplitude_polynomial()
                .square()
                .scale(self.normalization_squared),
            decay: Rational::new(2, self.n as i128),
        }
    }

    /// The symbolic wavefunction with caller-supplied `z` and `r`
    /// expressions; there is no shared symbol table to collide with.
    pub fn expression(&self, z: &Expr, r: &Expr) -> Expr {
        let n = self.n as i128;
        let l = self.l;
        let x = Expr::mul(vec![Expr::rational(2, n), z.clone(), r.clone()]);
        let normalization = Expr::mul(vec![
            Expr::rational(1, factorial(2 * l as u32 + 1)),
            Expr::pow(
                Expr::mul(vec![Expr::rational(2, n), z.clone()]),
                Expr::rational(3, 2),
            ),
            Expr::sqrt(Expr::from_rational(Rational::new(
                factorial((self.n + l) as u32),
                factorial((self.n - l - 1) as u32) * 2 * n,
            ))),
        ]);
        let series = Expr::add(
            self.hyper
                .terms()
                .map(|(degree, coefficient)| {
                    Expr::mul(vec![
                        Expr::from_rational(coefficient),
                        Expr::powi(x.clone(), degree as i128),
                    ])
                })
                .collect(),
        );
        Expr::mul(vec![
            normalization,
            Expr::powi(x.clone(), l as i128),
            series,
            Expr::exp(Expr::mul(vec![Expr::rational(-1, 2), x])),
        ])
    }

    pub fn eval(&self, z: f64, r: f64) -> f64 {
        let x = 2.0 * z * r / self.n as f64;
        let normalization = (self.normalization_squared.to_f64() * z.powi(3)).sqrt();
        normalization * x.powi(self.l) * self.hyper.eval_f64(x) * (-x / 2.0).exp()
    }
}

impl RadialDensity {
    /// Exact `integral_0^inf r^2 |R|^2 dr`; equals one for every valid
    /// orbital.
    pub fn normalization_integral(&self) -> Rational {
        let mut total = Rational::zero();
        for (degree, coefficient) in self.poly.terms() {
            total += coefficient
                * Rational::from_integer(factorial(degree as u32 + 2))
                * self.decay.pow(-(degree as i32) - 3);
        }
        total
    }
}

/// The normalized hydrogen-like radial wavefunction `R_nl(z, r)` as a
/// symbolic expression.
pub fn h_l_rnl(z: &Expr, n: i32, l: i32, r: &Expr) -> Result<Expr, QuantumNumberError> {
    Ok(RadialWavefunction::new(n, l)?.expression(z, r))
}

fn hypergeometric_series(n: i32, l: i32) -> Polynomial {
    let term_count = (n - l - 1) as usize;
    let mut coefficients = Vec::with_capacity(term_count + 1);
    let mut coefficient = Rational::one();
    coefficients.push(coefficient);
    for term in 1..=term_count as i128 {
        let numerator = (term - 1) - (n - l - 1) as i128;
        let denominator = (2 * l as i128 + 1 + term) * term;
        coefficient *= Rational::new(numerator, denominator);
        coefficients.push(coefficient);
    }
    Polynomial::new(coefficients)
}
