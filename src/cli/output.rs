//! CLI output formatting.
//!
//! Renderers return strings so tests can inspect exactly what the binary
//! prints.

use std::fmt::Write as _;

use super::args::OutputFormat;
use crate::config::ScenarioConfig;
use crate::error::ErlangResult;
use crate::report::Report;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Version line, with the git revision when it was known at build time.
#[must_use]
pub fn version_text() -> String {
    let version = option_env!("ERLANGC_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    match option_env!("GIT_HASH").filter(|hash| !hash.is_empty()) {
        Some(hash) => format!("erlangc {version} ({})", hash.get(..12).unwrap_or(hash)),
        None => format!("erlangc {version}"),
    }
}

/// Help message.
#[must_use]
pub const fn help_text() -> &'static str {
    r"erlangc - Erlang B/C and Erlang C with abandonment queueing formulas

USAGE:
    erlangc <COMMAND> [OPTIONS]

COMMANDS:
    run <scenario.yaml>         Evaluate a scenario file
        --json | --yaml         Machine-readable output

    validate <scenario.yaml>    Check a scenario file without evaluating it

    erlang-c                    Evaluate an M/M/c system
        --lambda <L>            Arrival rate
        --mu <M>                Service rate per server
        --servers <C>           Number of servers
        --t <T>                 Service-level threshold (repeatable)

    erlang-b                    Evaluate an M/M/c/c loss system
        --traffic <A>           Offered load in Erlangs
        --servers <C>           Number of servers

    extended                    Evaluate an M/M/c/K+M system with abandonment
        --lambda <L>            Arrival rate
        --mu <M>                Service rate per server
        --nu <N>                Abandonment rate (default: 0)
        --servers <C>           Number of servers
        --capacity <K>          System capacity (default: unlimited)
        --forward <P>           Forwarding probability (default: 0)
        --t <T>                 Service-level threshold (repeatable)

    help                        Show this help message
    version                     Show version information

GLOBAL OPTIONS:
    -v, --verbose               Debug logging on stderr (overrides RUST_LOG)

EXAMPLES:
    erlangc erlang-c --lambda 8 --mu 1 --servers 10 --t 0.5
    erlangc extended --lambda 8 --mu 1 --nu 0.5 --servers 10 --capacity 30 --json
    erlangc run scenarios/support_desk.yaml
"
}

/// Render a report in the requested format.
///
/// # Errors
///
/// Returns error if JSON or YAML serialization fails.
pub fn render_report(report: &Report, format: OutputFormat) -> ErlangResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => report.to_json(),
        OutputFormat::Yaml => report.to_yaml(),
    }
}

/// Human-readable report.
#[must_use]
pub fn render_text(report: &Report) -> String {
    let ind = &report.indicators;
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    if !report.name.is_empty() {
        let _ = writeln!(out, "Scenario: {}", report.name);
    }
    let _ = writeln!(out, "System:   {} with {} servers", report.system, report.servers);
    let _ = writeln!(out, "{RULE}\n");

    let _ = writeln!(out, "Load:");
    let _ = writeln!(out, "  Traffic intensity     {:>14.6} Erl", ind.traffic_intensity);
    let _ = writeln!(out, "  Utilization           {:>14.6}", ind.utilization);

    let probabilities = [
        ("Wait probability", ind.wait_probability),
        ("Blocking probability", ind.blocking_probability),
        ("Abandon probability", ind.abandon_probability),
    ];
    if probabilities.iter().any(|(_, p)| p.is_some()) {
        let _ = writeln!(out, "\nProbabilities:");
        for (label, p) in probabilities {
            if let Some(p) = p {
                let _ = writeln!(out, "  {label:<22}{p:>14.6}");
            }
        }
    }

    let _ = writeln!(out, "\nExpectations:");
    let _ = writeln!(out, "  Queue length   E[N_Q] {:>14.6}", ind.expected_queue_length);
    let _ = writeln!(out, "  In system      E[N]   {:>14.6}", ind.expected_system_length);
    let _ = writeln!(out, "  Waiting time   E[W]   {:>14.6}", ind.expected_wait);
    let _ = writeln!(out, "  Sojourn time   E[V]   {:>14.6}", ind.expected_sojourn);

    if !report.service_levels.is_empty() {
        let _ = writeln!(out, "\nService levels:");
        for level in &report.service_levels {
            let mark = match level.meets_target {
                Some(true) => "  ✓",
                Some(false) => "  ✗",
                None => "",
            };
            match level.probability {
                Some(p) => {
                    let _ = writeln!(out, "  P(W ≤ {}) = {p:.6}{mark}", level.threshold);
                }
                None => {
                    let _ = writeln!(out, "  P(W ≤ {}) = n/a", level.threshold);
                }
            }
        }
    }

    let check = &report.littles_law;
    let _ = writeln!(out);
    if check.consistent {
        let _ = writeln!(out, "✓ Little's law holds (tolerance {:.1e})", check.tolerance);
    } else {
        let _ = writeln!(
            out,
            "✗ {}",
            check.violation.as_deref().unwrap_or("Little's law violated")
        );
    }

    out
}

/// Summary of a successfully validated scenario.
#[must_use]
pub fn render_validation(config: &ScenarioConfig) -> String {
    let name = if config.scenario.name.is_empty() {
        "(unnamed)"
    } else {
        config.scenario.name.as_str()
    };
    format!(
        "✓ Scenario valid: {name}\n  model: {}\n  thresholds: {}\n",
        config.model.type_name(),
        config.service_level.thresholds.len()
    )
}
