//! Reference results for the full parse-compute-report path.

use effz_core::report::{Calculation, Report, parse_and_compute};

fn single_energy_report(input: &str) -> effz_core::report::EnergyReport {
    let mut batches = parse_and_compute(Calculation::Energy, input).expect("valid input");
    assert_eq!(batches.len(), 1);
    let batch = batches.pop().expect("one batch");
    assert_eq!(batch.reports.len(), 1);
    match batch.reports.into_iter().next().expect("one report") {
        Report::Energy(report) => report,
        other => panic!("expected an energy report, got {other:?}"),
    }
}

#[test]
fn helium_energy_matches_the_variational_result() {
    let report = single_energy_report("-z 2 -f N -v He");
    assert!((report.z_star - 27.0 / 16.0).abs() < 1.0e-12);
    assert!((report.energy + 729.0 / 256.0).abs() < 1.0e-12);
}

#[test]
fn hydrogen_from_explicit_tuples_recovers_the_exact_ground_state() {
    let report = single_energy_report("-z 1 -f o -v {{1,0,0,1}}");
    assert!((report.z_star - 1.0).abs() < 1.0e-12);
    assert!((report.energy + 0.5).abs() < 1.0e-12);
}

#[test]
fn helium_like_lithium_ion_screens_like_helium() {
    // Li II has the helium configuration, so z* = 3 - 5/16
    let report = single_energy_report("-z 3 -f i -v Li II");
    assert_eq!(report.occ_nums.len(), 2);
    assert!((report.z_star - (3.0 - 5.0 / 16.0)).abs() < 1.0e-12);
}

#[test]
fn charge_and_configuration_lists_multiply_out() {
    let batches = parse_and_compute(Calculation::ScatteringFactor, "-z 2, 3, 4 -f N -v He, Ne")
        .expect("valid input");
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].reports.len(), 6);
}

#[test]
fn neon_density_is_spherically_symmetric_with_two_shells() {
    let batches =
        parse_and_compute(Calculation::Density, "-z 10 -f N -v Ne").expect("valid input");
    let Report::Density(report) = &batches[0].reports[0] else {
        panic!("expected a density report");
    };
    assert!(
        !report.density.contains("cos"),
        "closed-shell neon density should not depend on the angle: {}",
        report.density,
    );
    assert!(report.density.contains("exp(-2*r*z)"));
    assert!(report.density.contains("exp(-r*z)"));
}

#[test]
fn separate_format_strings_keep_their_own_output_targets() {
    let batches = parse_and_compute(
        Calculation::Energy,
        "-z 2 -f N -v He -o helium.txt; -z 3 -f N -v Li",
    )
    .expect("valid input");
    assert_eq!(batches.len(), 2);
    assert_eq!(
        batches[0].output_path.as_deref(),
        Some(std::path::Path::new("helium.txt")),
    );
    assert_eq!(batches[1].output_path, None);
}
