//! CLI command handlers.
//!
//! [`execute`] does the work and returns the text to print, so the exit-code
//! and printing logic in [`run_cli`] stays trivial.

use std::path::Path;
use std::process::ExitCode;

use tracing::debug;

use super::args::OutputFormat;
use super::output::{help_text, render_report, render_validation, version_text};
use super::{Args, Command};
use crate::config::{ScenarioConfig, ScenarioConfigBuilder};
use crate::error::{ErlangError, ErlangResult};
use crate::report::Report;

/// Main CLI entry point.
///
/// Prints the command's output on stdout, errors on stderr, and maps
/// failures to exit code 1.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    if let Command::Invalid(message) = &args.command {
        eprintln!("Error: {message}\n");
        eprintln!("{}", help_text());
        return ExitCode::from(1);
    }

    match execute(&args.command) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Execute a command and return what it prints.
///
/// # Errors
///
/// Propagates scenario loading, validation and evaluation errors.
pub fn execute(command: &Command) -> ErlangResult<String> {
    debug!(?command, "executing");
    match command {
        Command::Run {
            scenario_path,
            format,
        } => run_scenario(scenario_path, *format),
        Command::Validate { scenario_path } => validate_scenario(scenario_path),
        Command::ErlangC {
            lambda,
            mu,
            servers,
            thresholds,
            format,
        } => {
            let config = with_thresholds(ScenarioConfig::builder(), thresholds)
                .erlang_c(*lambda, *mu, *servers)
                .build()?;
            evaluate(&config, *format)
        }
        Command::ErlangB {
            traffic,
            servers,
            format,
        } => {
            let config = ScenarioConfig::builder()
                .erlang_b(*traffic, 1.0, *servers)
                .build()?;
            evaluate(&config, *format)
        }
        Command::Extended {
            lambda,
            mu,
            nu,
            servers,
            capacity,
            forwarding,
            thresholds,
            format,
        } => {
            let config = with_thresholds(ScenarioConfig::builder(), thresholds)
                .extended(*lambda, *mu, *nu, *servers, *capacity)
                .forwarding_probability(*forwarding)
                .build()?;
            evaluate(&config, *format)
        }
        Command::Help => Ok(format!("{}\n", help_text())),
        Command::Version => Ok(format!("{}\n", version_text())),
        Command::Invalid(message) => Err(ErlangError::config(message.clone())),
    }
}

/// Evaluate a scenario file.
///
/// # Errors
///
/// Returns error if the file cannot be loaded or the model is unstable.
pub fn run_scenario(path: &Path, format: OutputFormat) -> ErlangResult<String> {
    let config = ScenarioConfig::load(path)?;
    evaluate(&config, format)
}

/// Load and validate a scenario file without evaluating it.
///
/// # Errors
///
/// Returns the first parse or validation error.
pub fn validate_scenario(path: &Path) -> ErlangResult<String> {
    let config = ScenarioConfig::load(path)?;
    Ok(render_validation(&config))
}

fn evaluate(config: &ScenarioConfig, format: OutputFormat) -> ErlangResult<String> {
    let report = Report::from_scenario(config)?;
    render_report(&report, format)
}

fn with_thresholds(builder: ScenarioConfigBuilder, thresholds: &[f64]) -> ScenarioConfigBuilder {
    thresholds
        .iter()
        .fold(builder, |builder, &t| builder.threshold(t))
}
