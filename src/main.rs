//! erlangc CLI - queueing formulas from the command line.

use std::process::ExitCode;

use erlangc::cli::{run_cli, Args};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    run_cli(args)
}

/// Log to stderr; `RUST_LOG` decides the level unless `-v` asks for debug.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,erlangc=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
