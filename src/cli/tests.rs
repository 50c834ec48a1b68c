//! CLI module tests.

use super::args::{Args, Command, OutputFormat};
use super::commands::{execute, run_scenario, validate_scenario};
use super::output::{help_text, render_text, render_validation, version_text};
use crate::config::ScenarioConfig;
use crate::report::Report;
use std::io::Write;
use std::path::PathBuf;

fn invalid_reason(args: &Args) -> &str {
    match &args.command {
        Command::Invalid(reason) => reason,
        other => unreachable!("expected Invalid, got {other:?}"),
    }
}

fn scenario_file(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

const SCENARIO: &str = "
scenario:
  name: cli test
model:
  type: erlang-c
  arrival_rate: 8
  service_rate: 1
  servers: 10
service_level:
  thresholds: [0.5]
  target: 0.8
";

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_shows_help() {
    let args = Args::parse_from(["erlangc"]);
    assert_eq!(args.command, Command::Help);
    assert!(!args.verbose);
}

#[test]
fn test_parse_help_and_version() {
    for flag in ["-h", "--help", "help"] {
        assert_eq!(Args::parse_from(["erlangc", flag]).command, Command::Help);
    }
    for flag in ["-V", "--version", "version"] {
        assert_eq!(Args::parse_from(["erlangc", flag]).command, Command::Version);
    }
}

#[test]
fn test_parse_unknown_command() {
    let args = Args::parse_from(["erlangc", "erlang-d"]);
    assert!(invalid_reason(&args).contains("unknown command"));
}

#[test]
fn test_parse_run_command() {
    let args = Args::parse_from(["erlangc", "run", "scenario.yaml"]);
    assert_eq!(
        args.command,
        Command::Run {
            scenario_path: PathBuf::from("scenario.yaml"),
            format: OutputFormat::Text,
        }
    );
}

#[test]
fn test_parse_run_command_formats_and_verbose() {
    let args = Args::parse_from(["erlangc", "run", "s.yaml", "--json", "-v"]);
    assert!(args.verbose);
    assert!(matches!(
        args.command,
        Command::Run {
            format: OutputFormat::Json,
            ..
        }
    ));

    let args = Args::parse_from(["erlangc", "run", "--yaml", "s.yaml", "--verbose"]);
    assert!(args.verbose);
    assert!(matches!(
        args.command,
        Command::Run {
            format: OutputFormat::Yaml,
            ..
        }
    ));

    let args = Args::parse_from(["erlangc", "run", "s.yaml", "--json", "--yaml"]);
    assert!(invalid_reason(&args).contains("mutually exclusive"));
}

#[test]
fn test_parse_run_requires_single_path() {
    let args = Args::parse_from(["erlangc", "run"]);
    assert!(invalid_reason(&args).contains("requires a scenario path"));

    let args = Args::parse_from(["erlangc", "run", "a.yaml", "b.yaml"]);
    assert!(invalid_reason(&args).contains("unexpected argument"));

    let args = Args::parse_from(["erlangc", "run", "a.yaml", "--seed", "1"]);
    assert!(invalid_reason(&args).contains("--seed"));
}

#[test]
fn test_parse_validate_command() {
    let args = Args::parse_from(["erlangc", "validate", "scenario.yaml"]);
    assert_eq!(
        args.command,
        Command::Validate {
            scenario_path: PathBuf::from("scenario.yaml"),
        }
    );
}

#[test]
fn test_parse_erlang_c_command() {
    let args = Args::parse_from([
        "erlangc", "erlang-c", "--lambda", "8", "--mu", "1", "--servers", "10", "--t", "0.5",
        "--t", "1",
    ]);
    assert_eq!(
        args.command,
        Command::ErlangC {
            lambda: 8.0,
            mu: 1.0,
            servers: 10,
            thresholds: vec![0.5, 1.0],
            format: OutputFormat::Text,
        }
    );
}

#[test]
fn test_parse_erlang_c_missing_option() {
    let args = Args::parse_from(["erlangc", "erlang-c", "--lambda", "8", "--servers", "10"]);
    assert!(invalid_reason(&args).contains("--mu"));
}

#[test]
fn test_parse_invalid_number() {
    let args = Args::parse_from(["erlangc", "erlang-c", "--lambda", "eight", "--mu", "1", "--servers", "10"]);
    assert!(invalid_reason(&args).contains("invalid value for --lambda"));

    let args = Args::parse_from(["erlangc", "erlang-b", "--traffic", "3", "--servers", "-2"]);
    assert!(invalid_reason(&args).contains("--servers"));
}

#[test]
fn test_parse_duplicate_option() {
    let args = Args::parse_from(["erlangc", "erlang-b", "--traffic", "3", "--traffic", "4", "--servers", "2"]);
    assert!(invalid_reason(&args).contains("more than once"));
}

#[test]
fn test_parse_missing_value() {
    let args = Args::parse_from(["erlangc", "erlang-b", "--traffic"]);
    assert!(invalid_reason(&args).contains("requires a value"));
}

#[test]
fn test_parse_erlang_b_command() {
    let args = Args::parse_from(["erlangc", "erlang-b", "--traffic", "10", "--servers", "10", "--yaml"]);
    assert_eq!(
        args.command,
        Command::ErlangB {
            traffic: 10.0,
            servers: 10,
            format: OutputFormat::Yaml,
        }
    );
}

#[test]
fn test_parse_extended_command() {
    let args = Args::parse_from([
        "erlangc", "extended", "--lambda", "8", "--mu", "1", "--nu", "0.5", "--servers", "10",
        "--capacity", "30",
    ]);
    assert_eq!(
        args.command,
        Command::Extended {
            lambda: 8.0,
            mu: 1.0,
            nu: 0.5,
            servers: 10,
            capacity: Some(30),
            forwarding: 0.0,
            thresholds: vec![],
            format: OutputFormat::Text,
        }
    );
}

#[test]
fn test_parse_extended_defaults() {
    let args = Args::parse_from(["erlangc", "extended", "--lambda", "8", "--mu", "1", "--servers", "10"]);
    match args.command {
        Command::Extended {
            nu,
            capacity,
            forwarding,
            ..
        } => {
            assert!(nu.abs() < f64::EPSILON);
            assert_eq!(capacity, None);
            assert!(forwarding.abs() < f64::EPSILON);
        }
        other => unreachable!("expected Extended, got {other:?}"),
    }
}

#[test]
fn test_parse_rejects_stray_positional() {
    let args = Args::parse_from(["erlangc", "erlang-b", "extra", "--traffic", "1", "--servers", "1"]);
    assert!(invalid_reason(&args).contains("extra"));
}

// ============================================================================
// Output tests
// ============================================================================

#[test]
fn test_help_text_lists_commands() {
    let help = help_text();
    for command in ["run", "validate", "erlang-c", "erlang-b", "extended", "--capacity"] {
        assert!(help.contains(command), "help lacks {command}");
    }
}

#[test]
fn test_version_text() {
    let version = version_text();
    assert!(version.starts_with("erlangc "));
    assert!(version.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_render_text() {
    let config = ScenarioConfig::from_yaml(SCENARIO).unwrap();
    let report = Report::from_scenario(&config).unwrap();
    let text = render_text(&report);

    assert!(text.contains("Scenario: cli test"));
    assert!(text.contains("M/M/c with 10 servers"));
    assert!(text.contains("Wait probability"));
    assert!(!text.contains("Blocking probability"));
    assert!(text.contains("P(W ≤ 0.5) = 0.849471  ✓"));
    assert!(text.contains("✓ Little's law holds"));
}

#[test]
fn test_render_validation() {
    let config = ScenarioConfig::builder().erlang_b(3.0, 1.0, 4).build().unwrap();
    let text = render_validation(&config);
    assert!(text.contains("(unnamed)"));
    assert!(text.contains("model: erlang-b"));
}

// ============================================================================
// Command execution tests
// ============================================================================

#[test]
fn test_execute_erlang_c() {
    let command = Args::parse_from(["erlangc", "erlang-c", "--lambda", "8", "--mu", "1", "--servers", "10", "--t", "0.5"]).command;
    let output = execute(&command).unwrap();
    assert!(output.contains("0.409180"));
    assert!(output.contains("0.204590"));
    assert!(output.contains("P(W ≤ 0.5) = 0.849471"));
}

#[test]
fn test_execute_erlang_c_unstable() {
    let command = Args::parse_from(["erlangc", "erlang-c", "--lambda", "20", "--mu", "1", "--servers", "5"]).command;
    let err = execute(&command).unwrap_err();
    assert!(err.is_stability_violation());
}

#[test]
fn test_execute_erlang_b_json() {
    let command = Args::parse_from(["erlangc", "erlang-b", "--traffic", "1", "--servers", "1", "--json"]).command;
    let output = execute(&command).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!((value["indicators"]["blocking_probability"].as_f64().unwrap() - 0.5).abs() < 1e-15);
}

#[test]
fn test_execute_extended_yaml() {
    let command = Args::parse_from([
        "erlangc", "extended", "--lambda", "8", "--mu", "1", "--nu", "0.5", "--servers", "10",
        "--capacity", "30", "--t", "0.5", "--yaml",
    ])
    .command;
    let output = execute(&command).unwrap();
    let report: Report = serde_yaml::from_str(&output).unwrap();
    assert_eq!(report.system, "M/M/c/K+M");
    let sl = report.service_levels[0].probability.unwrap();
    assert!((sl - 0.946_370_783_602_127).abs() < 1e-10);
}

#[test]
fn test_execute_extended_with_forwarding() {
    let command = Args::parse_from([
        "erlangc", "extended", "--lambda", "8", "--mu", "1", "--nu", "0.5", "--servers", "10",
        "--capacity", "30", "--forward", "0.25", "--json",
    ])
    .command;
    let output = execute(&command).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let traffic = value["indicators"]["traffic_intensity"].as_f64().unwrap();
    assert!((traffic - 10.0).abs() < 1e-12);

    let bad = Args::parse_from([
        "erlangc", "extended", "--lambda", "8", "--mu", "1", "--servers", "10", "--forward", "2",
    ])
    .command;
    assert!(execute(&bad).is_err());
}

#[test]
fn test_execute_large_call_centre() {
    let command = Args::parse_from([
        "erlangc", "erlang-c", "--lambda", "800", "--mu", "1", "--servers", "900", "--t", "0.01",
        "--json",
    ])
    .command;
    let output = execute(&command).unwrap();
    let report: Report = serde_json::from_str(&output).unwrap();
    assert!((report.indicators.expected_wait - 2.952_301_479_975_952_6e-6).abs() < 1e-16);
    let sl = report.service_levels[0].probability.unwrap();
    assert!((sl - 0.999_891_390_898_137_7).abs() < 1e-12);
    assert!(report.littles_law.consistent);
}

#[test]
fn test_execute_extended_rejects_small_capacity() {
    let command = Args::parse_from(["erlangc", "extended", "--lambda", "8", "--mu", "1", "--servers", "10", "--capacity", "4"]).command;
    assert!(execute(&command).is_err());
}

#[test]
fn test_execute_help_and_version() {
    assert!(execute(&Command::Help).unwrap().contains("USAGE"));
    assert!(execute(&Command::Version).unwrap().starts_with("erlangc"));
    assert!(execute(&Command::Invalid("nope".to_string())).is_err());
}

#[test]
fn test_run_scenario_file() {
    let file = scenario_file(SCENARIO);
    let output = run_scenario(file.path(), OutputFormat::Json).unwrap();
    let report: Report = serde_json::from_str(&output).unwrap();
    assert_eq!(report.name, "cli test");
    assert!(report.meets_targets());
}

#[test]
fn test_validate_scenario_file() {
    let file = scenario_file(SCENARIO);
    let output = validate_scenario(file.path()).unwrap();
    assert!(output.contains("✓ Scenario valid: cli test"));

    let broken = scenario_file("model: {type: erlang-c, arrival_rate: 8, servers: 10}");
    assert!(validate_scenario(broken.path()).is_err());
}

#[test]
fn test_missing_scenario_file() {
    let err = run_scenario(&PathBuf::from("/nonexistent/scenario.yaml"), OutputFormat::Text).unwrap_err();
    assert!(matches!(err, crate::error::ErlangError::Io(_)));
}
