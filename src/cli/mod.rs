//! CLI module for erlangc.
//!
//! All CLI logic lives here rather than in main.rs so that it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, OutputFormat};
pub use commands::{execute, run_cli, run_scenario, validate_scenario};
pub use output::{help_text, render_report, render_text, render_validation, version_text};

#[cfg(test)]
mod tests;
