//! Command-line layer: argument parsing, command dispatch and reporting.
//!
//! Kept separate from `core` so the pipeline can be used as a library.

use std::process::ExitCode;

use anyhow::Result;

pub mod args;
mod commands;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success.into());
    };

    let result = run::run(args)?;
    tracing::debug!(
        command = ?result.kind,
        errors = result.error_count,
        warnings = result.warning_count,
        "command finished"
    );
    report::print(&result);

    Ok(ExitStatus::from_error_count(result.error_count).into())
}
