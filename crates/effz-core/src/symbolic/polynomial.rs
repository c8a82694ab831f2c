use super::rational::{GaussRational, Rational};

/// Dense univariate polynomial with exact rational coefficients.
///
/// `coefficients[d]` is the coefficient of degree `d`; trailing zeros are
/// trimmed so the zero polynomial is the empty vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<Rational>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<Rational>) -> Self {
        let mut polynomial = Self { coefficients };
        polynomial.trim();
        polynomial
    }

    pub fn zero() -> Self {
        Self {
            coefficients: Vec::new(),
        }
    }

    pub fn one() -> Self {
        Self::constant(Rational::one())
    }

    pub fn constant(value: Rational) -> Self {
        Self::new(vec![value])
    }

    pub fn monomial(coefficient: Rational, degree: usize) -> Self {
        let mut coefficients = vec![Rational::zero(); degree + 1];
        coefficients[degree] = coefficient;
        Self::new(coefficients)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn degree(&self) -> Option<usize> {
        self.coefficients.len().checked_sub(1)
    }

    pub fn min_degree(&self) -> Option<usize> {
        self.coefficients.iter().position(|c| !c.is_zero())
    }

    pub fn coefficient(&self, degree: usize) -> Rational {
        self.coefficients
            .get(degree)
            .copied()
            .unwrap_or_else(Rational::zero)
    }

    pub fn terms(&self) -> impl Iterator<Item = (usize, Rational)> + '_ {
        self.coefficients
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .map(|(d, c)| (d, *c))
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut coefficients =
            vec![Rational::zero(); self.coefficients.len().max(other.coefficients.len())];
        for (degree, slot) in coefficients.iter_mut().enumerate() {
            *slot = self.coefficient(degree) + other.coefficient(degree);
        }
        Self::new(coefficients)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.scale(Rational::from_integer(-1)))
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut coefficients =
            vec![Rational::zero(); self.coefficients.len() + other.coefficients.len() - 1];
        for (da, ca) in self.terms() {
            for (db, cb) in other.terms() {
                coefficients[da + db] += ca * cb;
            }
        }
        Self::new(coefficients)
    }

    pub fn scale(&self, factor: Rational) -> Self {
        Self::new(self.coefficients.iter().map(|c| *c * factor).collect())
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Multiplies by `x^shift`. A negative shift is an exact division and
    /// returns `None` if any low-order coefficient would be lost.
    pub fn mul_xpow(&self, shift: i32) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::zero());
        }
        if shift >= 0 {
            let mut coefficients = vec![Rational::zero(); shift as usize];
            coefficients.extend(self.coefficients.iter().copied());
            return Some(Self::new(coefficients));
        }
        let drop = (-shift) as usize;
        if self.min_degree()? < drop {
            return None;
        }
        Some(Self::new(self.coefficients[drop..].to_vec()))
    }

    /// Exact polynomial division; `None` if the remainder is nonzero.
    pub fn divide_exact(&self, divisor: &Self) -> Option<Self> {
        assert!(!divisor.is_zero(), "division by the zero polynomial");
        if self.is_zero() {
            return Some(Self::zero());
        }
        let divisor_degree = divisor.degree()?;
        let dividend_degree = self.degree()?;
        if dividend_degree < divisor_degree {
            return None;
        }
        let leading = divisor.coefficient(divisor_degree);
        let mut remainder = self.coefficients.clone();
        let mut quotient = vec![Rational::zero(); dividend_degree - divisor_degree + 1];
        for step in (0..quotient.len()).rev() {
            let factor = remainder[step + divisor_degree] / leading;
            quotient[step] = factor;
            for (offset, divisor_coefficient) in divisor.terms() {
                remainder[step + offset] = remainder[step + offset] - factor * divisor_coefficient;
            }
        }
        if remainder.iter().any(|c| !c.is_zero()) {
            return None;
        }
        Some(Self::new(quotient))
    }

    pub fn derivative(&self) -> Self {
        if self.coefficients.len() <= 1 {
            return Self::zero();
        }
        Self::new(
            self.coefficients[1..]
                .iter()
                .enumerate()
                .map(|(index, c)| *c * Rational::from_integer(index as i128 + 1))
                .collect(),
        )
    }

    pub fn eval_rational(&self, at: Rational) -> Rational {
        let mut value = Rational::zero();
        for coefficient in self.coefficients.iter().rev() {
            value = value * at + *coefficient;
        }
        value
    }

    pub fn eval_f64(&self, at: f64) -> f64 {
        let mut value = 0.0;
        for coefficient in self.coefficients.iter().rev() {
            value = value * at + coefficient.to_f64();
        }
        value
    }

    /// Exact `integral_{-1}^{1} p(u) du`; odd monomials cancel.
    pub fn integral_over_symmetric_unit(&self) -> Rational {
        let mut total = Rational::zero();
        for (degree, coefficient) in self.terms() {
            if degree % 2 == 0 {
                total += coefficient * Rational::new(2, degree as i128 + 1);
            }
        }
        total
    }

    fn trim(&mut self) {
        while self
            .coefficients
            .last()
            .map(Rational::is_zero)
            .unwrap_or(false)
        {
            self.coefficients.pop();
        }
    }
}

/// Polynomial over Gaussian rationals, used only inside the plane-wave
/// integration where conjugate binomials must cancel exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaussPolynomial {
    coefficients: Vec<GaussRational>,
}

impl GaussPolynomial {
    pub fn new(coefficients: Vec<GaussRational>) -> Self {
        let mut polynomial = Self { coefficients };
        polynomial.trim();
        polynomial
    }

    pub fn zero() -> Self {
        Self {
            coefficients: Vec::new(),
        }
    }

    pub fn constant(value: GaussRational) -> Self {
        Self::new(vec![value])
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn coefficient(&self, degree: usize) -> GaussRational {
        self.coefficients
            .get(degree)
            .copied()
            .unwrap_or_else(GaussRational::zero)
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut coefficients =
            vec![GaussRational::zero(); self.coefficients.len().max(other.coefficients.len())];
        for (degree, slot) in coefficients.iter_mut().enumerate() {
            *slot = self.coefficient(degree) + other.coefficient(degree);
        }
        Self::new(coefficients)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.scale(-GaussRational::one()))
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut coefficients =
            vec![GaussRational::zero(); self.coefficients.len() + other.coefficients.len() - 1];
        for (da, ca) in self.coefficients.iter().enumerate() {
            if ca.is_zero() {
                continue;
            }
            for (db, cb) in other.coefficients.iter().enumerate() {
                if cb.is_zero() {
                    continue;
                }
                coefficients[da + db] += *ca * *cb;
            }
        }
        Self::new(coefficients)
    }

    pub fn scale(&self, factor: GaussRational) -> Self {
        Self::new(self.coefficients.iter().map(|c| *c * factor).collect())
    }

    pub fn pow(&self, exponent: u32) -> Self {
        let mut result = Self::constant(GaussRational::one());
        for _ in 0..exponent {
            result = result.mul(self);
        }
        result
    }

    /// Exact division by `x^power`; `None` when a low-order coefficient is
    /// nonzero.
    pub fn div_xpow_exact(&self, power: usize) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::zero());
        }
        if self.coefficients.len() <= power
            || self.coefficients[..power].iter().any(|c| !c.is_zero())
        {
            return None;
        }
        Some(Self::new(self.coefficients[power..].to_vec()))
    }

    /// Collapses to a rational polynomial; `None` if any imaginary part
    /// survived.
    pub fn into_rational(self) -> Option<Polynomial> {
        if self.coefficients.iter().any(|c| !c.is_real()) {
            return None;
        }
        Some(Polynomial::new(
            self.coefficients.into_iter().map(|c| c.re).collect(),
        ))
    }

    fn trim(&mut self) {
        while self
            .coefficients
            .last()
            .map(GaussRational::is_zero)
            .unwrap_or(false)
        {
            self.coefficients.pop();
        }
    }
}

/// `(a + sign*i*x)^power` as an exact Gaussian polynomial in `x`.
pub fn complex_binomial_power(a: Rational, sign: i32, power: u32) -> GaussPolynomial {
    let unit = if sign >= 0 {
        GaussRational::i()
    } else {
        -GaussRational::i()
    };
    let base = GaussPolynomial::new(vec![GaussRational::from_rational(a), unit]);
    base.pow(power)
}

#[cfg(test)]
mod tests {
    use super::{GaussPolynomial, Polynomial, complex_binomial_power};
    use crate::symbolic::rational::{GaussRational, Rational};

    fn poly(coefficients: &[i128]) -> Polynomial {
        Polynomial::new(
            coefficients
                .iter()
                .map(|c| Rational::from_integer(*c))
                .collect(),
        )
    }

    #[test]
    fn multiplication_and_degree_bookkeeping() {
        let p = poly(&[1, 2]);
        let q = poly(&[-1, 1]);
        assert_eq!(p.mul(&q), poly(&[-1, -1, 2]));
        assert_eq!(p.mul(&q).degree(), Some(2));
        assert_eq!(Polynomial::zero().degree(), None);
        assert_eq!(poly(&[0, 0, 3]).min_degree(), Some(2));
    }

    #[test]
    fn exact_monomial_shifts_guard_low_order_terms() {
        let p = poly(&[0, 0, 4, 1]);
        assert_eq!(p.mul_xpow(-2), Some(poly(&[4, 1])));
        assert_eq!(p.mul_xpow(-3), None);
        assert_eq!(poly(&[1]).mul_xpow(2), Some(poly(&[0, 0, 1])));
    }

    #[test]
    fn exact_division_detects_nonzero_remainders() {
        let product = poly(&[-1, 0, 1]);
        let factor = poly(&[1, 1]);
        assert_eq!(product.divide_exact(&factor), Some(poly(&[-1, 1])));
        assert_eq!(product.divide_exact(&poly(&[2, 1])), None);
    }

    #[test]
    fn symmetric_unit_integral_drops_odd_powers() {
        let p = poly(&[3, 7, 1]);
        // 3*2 + 0 + 2/3
        assert_eq!(
            p.integral_over_symmetric_unit(),
            Rational::new(20, 3),
        );
    }

    #[test]
    fn complex_binomial_power_expands_conjugate_pairs() {
        let a = Rational::from_integer(2);
        let plus = complex_binomial_power(a, 1, 2);
        let minus = complex_binomial_power(a, -1, 2);
        // (2+ix)^2 - (2-ix)^2 = 8ix
        let difference = plus.sub(&minus);
        assert_eq!(difference.coefficient(0), GaussRational::zero());
        assert_eq!(
            difference.coefficient(1),
            GaussRational::new(Rational::zero(), Rational::from_integer(8)),
        );
        assert_eq!(difference.coefficient(2), GaussRational::zero());
    }

    #[test]
    fn gauss_polynomials_collapse_to_rational_when_imaginary_parts_cancel() {
        let real = GaussPolynomial::new(vec![
            GaussRational::from_rational(Rational::new(1, 2)),
            GaussRational::from_rational(Rational::from_integer(3)),
        ]);
        let collapsed = real.clone().into_rational().expect("real polynomial");
        assert_eq!(collapsed.coefficient(1), Rational::from_integer(3));

        let imaginary = GaussPolynomial::new(vec![GaussRational::i()]);
        assert!(imaginary.into_rational().is_none());
    }
}
