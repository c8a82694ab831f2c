use super::CliError;
use effz_core::report::{Calculation, Report, parse_and_compute};
use std::fs;
use std::path::PathBuf;
use tracing::info;

const FORMAT_HELP: &str = "\
FORMAT_STRING looks like:

    -z Z1, Z2, ... -f FORMAT -v VALUES1, VALUES2, ... [-o PATH]

and several format strings can be chained with ';'. The charges Z are
integers in 1..=100. FORMAT selects how VALUES are read:

    n   element numbers, e.g. \"5\" for the boron ground state
    N   element names, e.g. \"He, Li\"
    i   ions, element name plus Roman degree, e.g. \"Ne II\"
    o   occupation tuples, e.g. \"{{1,0,0,1},{1,0,0,-1}}\"
    O   element name with appended tuples, e.g. \"B {{2,1,1,-1}}\"

Occupation tuples are {n, l, m, ms} with 1 <= n <= 7, 0 <= l <= n-1,
-l <= m <= l and ms = -1 or 1. With -o the reports of that format string
are written to PATH instead of standard output.";

#[derive(clap::Args)]
#[command(after_long_help = FORMAT_HELP)]
pub(super) struct CalcArgs {
    /// Calculation format string, e.g. "-z 2 -f N -v He"
    #[arg(value_name = "FORMAT_STRING", allow_hyphen_values = true)]
    format_string: String,

    /// Emit reports as JSON instead of banner text
    #[arg(long)]
    json: bool,

    /// Default output file for format strings without an -o flag
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

pub(super) fn run_calculation(
    calculation: Calculation,
    args: &CalcArgs,
) -> Result<i32, CliError> {
    let batches = parse_and_compute(calculation, &args.format_string)?;
    info!(
        batches = batches.len(),
        json = args.json,
        "computed calculation batches"
    );

    // consecutive batches aimed at the same destination are written together
    let mut outputs: Vec<(Option<PathBuf>, String)> = Vec::new();
    for batch in &batches {
        let target = batch
            .output_path
            .clone()
            .or_else(|| args.output.clone());
        let rendered = render_reports(&batch.reports, args.json);
        match outputs.last_mut() {
            Some((last_target, buffer)) if *last_target == target => buffer.push_str(&rendered),
            _ => outputs.push((target, rendered)),
        }
    }

    for (target, rendered) in outputs {
        match target {
            Some(path) => {
                fs::write(&path, rendered)?;
                info!(path = %path.display(), "wrote reports");
            }
            None => print!("{rendered}"),
        }
    }
    Ok(0)
}

fn render_reports(reports: &[Report], as_json: bool) -> String {
    if as_json {
        let values: Vec<serde_json::Value> = reports.iter().map(Report::to_json).collect();
        let mut rendered =
            serde_json::to_string_pretty(&values).expect("reports serialize to JSON");
        rendered.push('\n');
        rendered
    } else {
        reports.iter().map(Report::render).collect()
    }
}
