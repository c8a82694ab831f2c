mod commands;

use clap::Parser;
use effz_core::input::InputError;
use effz_core::report::{Calculation, ReportError};

pub fn run_from_env() -> i32 {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("ERROR: [{}] {error}", error.category());
            error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args: Vec<String> = std::iter::once("effz-rs".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect();
    match Cli::try_parse_from(&full_args) {
        Ok(cli) => dispatch(cli.command),
        Err(error) => match error.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{error}");
                Ok(0)
            }
            _ => Err(CliError::Usage(error.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "effz-rs",
    about = "Zeroth-order effective charge, density, and scattering-factor calculations"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Compute effective charges and energies for configurations
    Energy(commands::CalcArgs),
    /// Derive symbolic electron densities
    Density(commands::CalcArgs),
    /// Derive symbolic atomic scattering factors
    Asf(commands::CalcArgs),
}

fn dispatch(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Energy(args) => commands::run_calculation(Calculation::Energy, &args),
        CliCommand::Density(args) => commands::run_calculation(Calculation::Density, &args),
        CliCommand::Asf(args) => {
            commands::run_calculation(Calculation::ScatteringFactor, &args)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Compute(#[from] ReportError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    pub fn category(&self) -> &'static str {
        match self {
            Self::Usage(_) => "INPUT.CLI_USAGE",
            Self::Compute(ReportError::Input(_)) => "INPUT.FORMAT_STRING",
            Self::Compute(_) => "RUN.CALCULATION",
            Self::Io(_) => "IO.REPORT_OUTPUT",
            Self::Internal(_) => "SYS.INTERNAL",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Compute(ReportError::Input(_)) => 2,
            Self::Compute(_) => 4,
            Self::Io(_) => 3,
            Self::Internal(_) => 5,
        }
    }
}

impl From<InputError> for CliError {
    fn from(error: InputError) -> Self {
        Self::Compute(ReportError::Input(error))
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
