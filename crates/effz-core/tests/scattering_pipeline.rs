//! End-to-end properties of the derivation pipeline, from radial
//! wavefunctions through the scattering-parameter substitution.

use effz_core::atomic_data::ground_state;
use effz_core::common::constants::BOHR;
use effz_core::domain::OccNum;
use effz_core::symbolic::{Expr, Rational};
use effz_core::zeroth_order::angular_density_polynomial;
use effz_core::zeroth_order::{FormFactor, asf_h_l, h_l_rnl, rho_h_l, rho_h_l_fourier};

fn occ(n: i32, l: i32, m: i32, ms: i32) -> OccNum {
    OccNum::new(n, l, m, ms).expect("valid occupation numbers")
}

#[test]
fn hydrogen_ground_state_wavefunction_reduces_to_the_closed_form() {
    let r = Expr::symbol("r");
    let atomic_units = h_l_rnl(&Expr::one(), 1, 0, &r).expect("valid");
    assert_eq!(atomic_units.to_string(), "2*exp(-r)");

    let z = Expr::symbol("z");
    let general = h_l_rnl(&z, 1, 0, &r).expect("valid");
    assert_eq!(general.to_string(), "2*z^(3/2)*exp(-r*z)");
}

#[test]
fn single_orbital_densities_integrate_to_one_over_the_sphere() {
    // the angular factor of every |Y_lm|^2 integrates to exactly one over
    // the full solid angle, independently of the radial factor
    for l in 0..=4 {
        for m in -l..=l {
            let angular = angular_density_polynomial(l, m).expect("valid");
            let solid_angle_integral =
                Rational::new(1, 2) * angular.integral_over_symmetric_unit();
            assert_eq!(
                solid_angle_integral,
                Rational::one(),
                "angular normalization failed for l={l} m={m}",
            );
        }
    }
}

#[test]
fn configuration_density_is_invariant_under_permutation() {
    let z = Expr::symbol("z");
    let r = Expr::symbol("r");
    let theta = Expr::symbol("theta");
    let phi = Expr::symbol("phi");

    let configuration = vec![
        occ(1, 0, 0, 1),
        occ(1, 0, 0, -1),
        occ(2, 0, 0, 1),
        occ(2, 1, -1, 1),
        occ(2, 1, 0, 1),
        occ(3, 2, 1, -1),
    ];
    let mut permuted = configuration.clone();
    permuted.reverse();
    permuted.swap(1, 4);

    let direct = rho_h_l(&z, &configuration, &r, &theta, &phi).expect("valid");
    let reordered = rho_h_l(&z, &permuted, &r, &theta, &phi).expect("valid");
    assert_eq!(direct, reordered);
    assert!(Expr::sub(direct, reordered).is_zero());
}

#[test]
fn ground_state_form_factor_matches_the_textbook_expression() {
    let z = Expr::symbol("z");
    let q = Expr::symbol("q");
    let hydrogen = [occ(1, 0, 0, 1)];

    let symbolic = rho_h_l_fourier(&z, &hydrogen, &q).expect("valid");
    assert_eq!(symbolic.to_string(), "16*z^4/(q^2 + 4*z^2)^2");

    let atomic_units = rho_h_l_fourier(&Expr::one(), &hydrogen, &q).expect("valid");
    assert_eq!(atomic_units.to_string(), "16/(q^2 + 4)^2");
}

#[test]
fn forward_scattering_returns_the_electron_count() {
    let z = Expr::symbol("z");

    let hydrogen = [occ(1, 0, 0, 1)];
    assert_eq!(
        asf_h_l(&z, &hydrogen, &Expr::zero()).expect("valid"),
        Expr::one(),
    );

    let neon = ground_state(10).expect("tabulated");
    assert_eq!(
        asf_h_l(&z, neon, &Expr::zero()).expect("valid"),
        Expr::integer(10),
    );
    assert_eq!(
        FormFactor::for_configuration(neon)
            .expect("valid")
            .forward_value(),
        Rational::from_integer(10),
    );
}

#[test]
fn scattering_parameter_substitution_round_trips_exactly() {
    let z = Expr::symbol("z");
    let q = Expr::symbol("q");
    let s = Expr::symbol("s");
    let configuration = vec![
        occ(1, 0, 0, 1),
        occ(1, 0, 0, -1),
        occ(2, 0, 0, 1),
        occ(2, 1, 1, -1),
    ];

    let fourier = rho_h_l_fourier(&z, &configuration, &q).expect("valid");
    let scattering_factor = asf_h_l(&z, &configuration, &s).expect("valid");

    let scale = Expr::mul(vec![Expr::integer(4), Expr::Pi, Expr::float(BOHR)]);
    let inverse = Expr::mul(vec![q.clone(), Expr::pow(scale, Expr::integer(-1))]);
    let round_trip = scattering_factor.substitute(&s, &inverse);

    assert_eq!(round_trip.clone(), fourier);
    assert!(Expr::sub(round_trip, fourier).is_zero());
}

#[test]
fn scattering_factor_agrees_with_the_form_factor_numerically() {
    let z = Expr::symbol("z");
    let s = Expr::symbol("s");
    let configuration = vec![occ(1, 0, 0, 1), occ(1, 0, 0, -1), occ(2, 0, 0, -1)];

    let scattering_factor = asf_h_l(&z, &configuration, &s).expect("valid");
    let form_factor = FormFactor::for_configuration(&configuration).expect("valid");

    for (z_value, s_value) in [(2.0, 0.1), (3.0, 0.8), (4.0, 2.5)] {
        let q_value = 4.0 * std::f64::consts::PI * BOHR * s_value;
        let from_expression = scattering_factor
            .eval(&[("z", z_value), ("s", s_value)])
            .expect("bound");
        let from_rational_function = form_factor.eval(q_value / z_value);
        assert!(
            (from_expression - from_rational_function).abs()
                <= 1.0e-10 * from_rational_function.abs().max(1.0),
            "mismatch at z={z_value} s={s_value}",
        );
    }
}
