//! Electron densities of hydrogen-like configurations.
//!
//! Densities accumulate in a structured form keyed by principal quantum
//! number and by powers of `cos(theta)` and `r`, so configurations that
//! differ only by orbital order produce identical expressions and full
//! subshells collapse to their spherical average automatically.

use crate::domain::{OccNum, QuantumNumberError};
use crate::numerics::spherical_harmonic;
use crate::symbolic::{Expr, Rational};
use crate::zeroth_order::angular::angular_density_polynomial;
use crate::zeroth_order::radial::RadialWavefunction;
use std::collections::BTreeMap;

type ShellTerms = BTreeMap<(usize, usize), Rational>;

/// Probability density of a single occupied orbital:
/// `|Y_lm(theta, phi)|^2 * |R_nl(z, r)|^2`, functionally expanded. The
/// azimuthal phase cancels in the squared modulus, so `phi` does not appear
/// in the result.
pub fn rho_h_l_p(
    z: &Expr,
    n: i32,
    l: i32,
    m: i32,
    r: &Expr,
    theta: &Expr,
    _phi: &Expr,
) -> Result<Expr, QuantumNumberError> {
    let mut shells: BTreeMap<i32, ShellTerms> = BTreeMap::new();
    accumulate_orbital(&mut shells, n, l, m)?;
    Ok(render_density(&shells, z, r, theta))
}

/// Total density of a configuration: the sum of single-orbital densities,
/// algebraically simplified. Invariant under permutation of `occ_nums`.
pub fn rho_h_l(
    z: &Expr,
    occ_nums: &[OccNum],
    r: &Expr,
    theta: &Expr,
    _phi: &Expr,
) -> Result<Expr, QuantumNumberError> {
    let mut shells: BTreeMap<i32, ShellTerms> = BTreeMap::new();
    for occ_num in occ_nums {
        occ_num.validate()?;
        accumulate_orbital(&mut shells, occ_num.n, occ_num.l, occ_num.m)?;
    }
    Ok(render_density(&shells, z, r, theta))
}

fn accumulate_orbital(
    shells: &mut BTreeMap<i32, ShellTerms>,
    n: i32,
    l: i32,
    m: i32,
) -> Result<(), QuantumNumberError> {
    let radial = RadialWavefunction::new(n, l)?.density();
    let angular = angular_density_polynomial(l, m)?;
    let shell = shells.entry(n).or_default();
    for (cosine_power, angular_coefficient) in angular.terms() {
        for (radial_power, radial_coefficient) in radial.poly.terms() {
            let slot = shell
                .entry((cosine_power, radial_power))
                .or_insert_with(Rational::zero);
            *slot += angular_coefficient * radial_coefficient;
        }
    }
    Ok(())
}

fn render_density(
    shells: &BTreeMap<i32, ShellTerms>,
    z: &Expr,
    r: &Expr,
    theta: &Expr,
) -> Expr {
    let mut shell_expressions = Vec::new();
    for (n, terms) in shells {
        let mut term_expressions = Vec::new();
        for ((cosine_power, radial_power), coefficient) in terms {
            if coefficient.is_zero() {
                continue;
            }
            term_expressions.push(Expr::mul(vec![
                Expr::from_rational(*coefficient),
                Expr::powi(z.clone(), 3 + *radial_power as i128),
                Expr::powi(r.clone(), *radial_power as i128),
                Expr::powi(Expr::cos(theta.clone()), *cosine_power as i128),
            ]));
        }
        if term_expressions.is_empty() {
            continue;
        }
        shell_expressions.push(Expr::mul(vec![
            Expr::rational(1, 4),
            Expr::powi(Expr::Pi, -1),
            Expr::exp(Expr::mul(vec![
                Expr::rational(-2, *n as i128),
                z.clone(),
                r.clone(),
            ])),
            Expr::add(term_expressions),
        ]));
    }
    Expr::add(shell_expressions)
}

/// Pointwise density evaluator for a fixed charge, the numeric counterpart
/// of `rho_h_l`.
#[derive(Debug, Clone)]
pub struct DensityMap {
    z: f64,
    occ_nums: Vec<OccNum>,
    wavefunctions: Vec<RadialWavefunction>,
}

impl DensityMap {
    pub fn new(z: f64, occ_nums: &[OccNum]) -> Result<Self, QuantumNumberError> {
        let mut wavefunctions = Vec::with_capacity(occ_nums.len());
        for occ_num in occ_nums {
            occ_num.validate()?;
            wavefunctions.push(RadialWavefunction::new(occ_num.n, occ_num.l)?);
        }
        Ok(Self {
            z,
            occ_nums: occ_nums.to_vec(),
            wavefunctions,
        })
    }

    pub fn charge(&self) -> f64 {
        self.z
    }

    pub fn eval(&self, r: f64, theta: f64, phi: f64) -> f64 {
        self.occ_nums
            .iter()
            .zip(&self.wavefunctions)
            .map(|(occ_num, wavefunction)| {
                let radial = wavefunction.eval(self.z, r);
                let angular = spherical_harmonic(occ_num.l, occ_num.m, theta, phi).norm_sqr();
                radial * radial * angular
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{DensityMap, rho_h_l, rho_h_l_p};
    use crate::domain::OccNum;
    use crate::symbolic::Expr;

    fn symbols() -> (Expr, Expr, Expr, Expr) {
        (
            Expr::symbol("z"),
            Expr::symbol("r"),
            Expr::symbol("theta"),
            Expr::symbol("phi"),
        )
    }

    #[test]
    fn ground_state_density_matches_the_closed_form() {
        let (z, r, theta, phi) = symbols();
        let density = rho_h_l_p(&z, 1, 0, 0, &r, &theta, &phi).expect("valid");
        assert_eq!(density.to_string(), "z^3*exp(-2*r*z)/pi");
    }

    #[test]
    fn filled_p_shell_collapses_to_a_spherical_density() {
        let (z, r, theta, phi) = symbols();
        let shell: Vec<OccNum> = (-1..=1)
            .map(|m| OccNum::new(2, 1, m, 1).expect("valid"))
            .collect();
        let density = rho_h_l(&z, &shell, &r, &theta, &phi).expect("valid");
        let rendered = density.to_string();
        assert!(
            !rendered.contains("cos"),
            "filled shell density should be angle-free, got {rendered}",
        );
    }

    #[test]
    fn configuration_order_never_changes_the_expression() {
        let (z, r, theta, phi) = symbols();
        let helium_lithium: Vec<OccNum> = vec![
            OccNum::new(1, 0, 0, 1).expect("valid"),
            OccNum::new(1, 0, 0, -1).expect("valid"),
            OccNum::new(2, 0, 0, 1).expect("valid"),
            OccNum::new(2, 1, -1, 1).expect("valid"),
        ];
        let mut permuted = helium_lithium.clone();
        permuted.rotate_left(2);
        permuted.swap(0, 1);

        let direct = rho_h_l(&z, &helium_lithium, &r, &theta, &phi).expect("valid");
        let reordered = rho_h_l(&z, &permuted, &r, &theta, &phi).expect("valid");
        assert_eq!(direct, reordered);
        assert!(Expr::sub(direct, reordered).is_zero());
    }

    #[test]
    fn empty_configuration_has_zero_density() {
        let (z, r, theta, phi) = symbols();
        let density = rho_h_l(&z, &[], &r, &theta, &phi).expect("valid");
        assert!(density.is_zero());
    }

    #[test]
    fn symbolic_and_pointwise_densities_agree() {
        let (z, r, theta, phi) = symbols();
        let beryllium_like: Vec<OccNum> = vec![
            OccNum::new(1, 0, 0, 1).expect("valid"),
            OccNum::new(1, 0, 0, -1).expect("valid"),
            OccNum::new(2, 1, 1, 1).expect("valid"),
            OccNum::new(3, 2, -2, -1).expect("valid"),
        ];
        let expression = rho_h_l(&z, &beryllium_like, &r, &theta, &phi).expect("valid");
        let map = DensityMap::new(2.0, &beryllium_like).expect("valid");
        for (r_value, theta_value, phi_value) in
            [(0.4, 0.9, 0.0), (1.5, 2.1, 1.3), (3.0, 0.2, -2.0)]
        {
            let symbolic = expression
                .eval(&[("z", 2.0), ("r", r_value), ("theta", theta_value)])
                .expect("bound");
            let pointwise = map.eval(r_value, theta_value, phi_value);
            assert!(
                (symbolic - pointwise).abs() <= 1.0e-12 * pointwise.abs().max(1.0),
                "density mismatch at r={r_value} theta={theta_value}",
            );
        }
    }
}
