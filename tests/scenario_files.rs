use erlangc::cli::{execute, Args};
use erlangc::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

fn scenarios_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

fn write_scenario(dir: &Path, name: &str, yaml: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    path
}

#[test]
fn bundled_scenarios_load_and_evaluate() {
    let mut count = 0;
    for entry in std::fs::read_dir(scenarios_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        let config = ScenarioConfig::load(&path)
            .unwrap_or_else(|e| unreachable!("{}: {e}", path.display()));
        let report = Report::from_scenario(&config)
            .unwrap_or_else(|e| unreachable!("{}: {e}", path.display()));
        assert!(report.littles_law.consistent, "{}", path.display());
        assert_eq!(report.service_levels.len(), config.service_level.thresholds.len());
        count += 1;
    }
    assert!(count >= 5);
}

#[test]
fn contact_centre_pool_is_finite() {
    let config = ScenarioConfig::load(scenarios_dir().join("contact_centre_pool.yaml")).unwrap();
    let report = Report::from_scenario(&config).unwrap();
    assert_eq!(report.servers, 900);
    assert!((report.indicators.traffic_intensity - 1_050.0).abs() < 1e-9);
    for level in &report.service_levels {
        let p = level.probability.unwrap();
        assert!((0.0..=1.0).contains(&p), "P(W ≤ {}) = {p}", level.threshold);
    }
    let levels: Vec<f64> = report.service_levels.iter().filter_map(|l| l.probability).collect();
    assert!(levels.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn support_desk_reference_values() {
    let config = ScenarioConfig::load(scenarios_dir().join("support_desk.yaml")).unwrap();
    let report = Report::from_scenario(&config).unwrap();

    let ind = report.indicators;
    assert!((ind.abandon_probability.unwrap() - 0.038_821_113_032_276_644).abs() < 1e-12);
    assert!((ind.expected_system_length - 8.310_566_177_772_769).abs() < 1e-11);

    let at_half = report
        .service_levels
        .iter()
        .find(|level| (level.threshold - 0.5).abs() < f64::EPSILON)
        .unwrap();
    assert!((at_half.probability.unwrap() - 0.946_370_783_602_127).abs() < 1e-10);
    assert_eq!(at_half.meets_target, Some(true));
}

#[test]
fn scenario_written_by_builder_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let config = ScenarioConfig::builder()
        .name("round trip")
        .extended(12.0, 1.0, 0.2, 10, None)
        .threshold(1.0)
        .target(0.5)
        .build()
        .unwrap();
    let path = write_scenario(dir.path(), "unlimited.yaml", &config.to_yaml().unwrap());

    let reloaded = ScenarioConfig::load(&path).unwrap();
    assert_eq!(reloaded, config);

    // Overloaded but abandonment keeps it stable
    let report = Report::from_scenario(&reloaded).unwrap();
    assert_eq!(report.stability, Stability::Stable);
    assert!(report.indicators.abandon_probability.unwrap() > 0.0);
}

#[test]
fn unstable_scenario_fails_to_evaluate() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_scenario(
        dir.path(),
        "overload.yaml",
        "model: {type: erlang-c, arrival_rate: 20, service_rate: 1, servers: 5}\n",
    );
    let config = ScenarioConfig::load(&path).unwrap();
    let err = Report::from_scenario(&config).unwrap_err();
    assert!(err.is_stability_violation());
    assert!(err.to_string().contains("unstable system"));
}

#[test]
fn invalid_scenarios_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        ("unknown_field.yaml", "model: {type: erlang-b, arrival_rate: 1, servers: 1, lines: 3}"),
        ("no_servers.yaml", "model: {type: erlang-b, arrival_rate: 1, servers: 0}"),
        ("bad_capacity.yaml", "model: {type: extended, arrival_rate: 1, service_rate: 1, servers: 4, capacity: 2}"),
        ("bad_type.yaml", "model: {type: erlang-x, arrival_rate: 1, servers: 1}"),
        ("not_yaml.yaml", "model: [unterminated"),
    ];
    for (name, yaml) in cases {
        let path = write_scenario(dir.path(), name, yaml);
        assert!(ScenarioConfig::load(&path).is_err(), "{name} was accepted");
    }
}

#[test]
fn cli_run_matches_library() {
    let path = scenarios_dir().join("call_centre.yaml");
    let command = Args::parse_from(["erlangc", "run", path.to_str().unwrap(), "--json"]).command;
    let output = execute(&command).unwrap();
    let from_cli: Report = serde_json::from_str(&output).unwrap();

    let from_lib = Report::from_scenario(&ScenarioConfig::load(&path).unwrap()).unwrap();
    assert_eq!(from_cli.name, from_lib.name);
    let close = |a: f64, b: f64| (a - b).abs() <= 1e-14 * a.abs().max(1.0);
    assert!(close(from_cli.indicators.expected_wait, from_lib.indicators.expected_wait));
    assert!(close(
        from_cli.indicators.expected_queue_length,
        from_lib.indicators.expected_queue_length
    ));
    for (cli, lib) in from_cli.service_levels.iter().zip(&from_lib.service_levels) {
        assert!(close(cli.probability.unwrap(), lib.probability.unwrap()));
        assert_eq!(cli.meets_target, lib.meets_target);
    }
}
