//! In-process entry points for the `effz-rs` command-line interface.

mod cli;

pub use cli::{CliError, run, run_from_env};
