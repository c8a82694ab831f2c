use effz_cli::run;
use std::fs;
use tempfile::TempDir;

#[test]
fn energy_command_writes_banner_reports() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("helium.txt");

    let code = run([
        "energy",
        "-z 2 -f N -v He",
        "--output",
        output.to_str().expect("utf-8 path"),
    ])
    .expect("command succeeds");
    assert_eq!(code, 0);

    let rendered = fs::read_to_string(&output).expect("report file");
    assert!(rendered.contains("*****The calculation result is:******"));
    assert!(rendered.contains("*** \"He\" ***"));
    assert!(rendered.contains("*** z = 2 ***"));
    assert!(rendered.contains("z_star = 1.6875"));
    assert!(rendered.contains("{1, 0, 0, -1}"));
}

#[test]
fn asf_command_emits_json_reports() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("asf.json");

    let code = run([
        "asf",
        "-z 1 -f o -v {{1,0,0,1}}",
        "--json",
        "--output",
        output.to_str().expect("utf-8 path"),
    ])
    .expect("command succeeds");
    assert_eq!(code, 0);

    let rendered = fs::read_to_string(&output).expect("report file");
    let reports: serde_json::Value = serde_json::from_str(&rendered).expect("valid JSON");
    let report = &reports[0];
    assert_eq!(report["kind"], "asf");
    assert_eq!(report["z"], 1);
    assert!(
        report["asf"]
            .as_str()
            .expect("asf is rendered as text")
            .contains("0.52917721067")
    );
    assert_eq!(report["occ_nums"][0]["n"], 1);
}

#[test]
fn format_string_output_flags_win_over_the_default_target() {
    let temp = TempDir::new().expect("tempdir");
    let inline_target = temp.path().join("helium.txt");
    let default_target = temp.path().join("rest.txt");

    let format_string = format!(
        "-z 2 -f N -v He -o {}; -z 3 -f N -v Li",
        inline_target.to_str().expect("utf-8 path"),
    );
    let code = run([
        "density",
        format_string.as_str(),
        "--output",
        default_target.to_str().expect("utf-8 path"),
    ])
    .expect("command succeeds");
    assert_eq!(code, 0);

    let inline = fs::read_to_string(&inline_target).expect("inline target");
    assert!(inline.contains("*** \"He\" ***"));
    let default = fs::read_to_string(&default_target).expect("default target");
    assert!(default.contains("*** \"Li\" ***"));
    assert!(!default.contains("*** \"He\" ***"));
}

#[test]
fn unknown_elements_fail_with_the_input_exit_code() {
    let error = run(["energy", "-z 2 -f N -v Xx"]).expect_err("unknown element");
    assert_eq!(error.exit_code(), 2);
    assert!(error.to_string().contains("Xx"));
}

#[test]
fn usage_errors_fail_with_the_input_exit_code() {
    let error = run(["energy"]).expect_err("missing format string");
    assert_eq!(error.exit_code(), 2);

    let error = run(["transmogrify", "-z 2 -f N -v He"]).expect_err("unknown subcommand");
    assert_eq!(error.exit_code(), 2);
}

#[test]
fn help_requests_exit_cleanly() {
    assert_eq!(run(["--help"]).expect("help"), 0);
    assert_eq!(run(["energy", "--help"]).expect("help"), 0);
}
