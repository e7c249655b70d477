//! Config Loading Tests
//!
//! Loads guide_config.toml files from disk and checks they feed the starting
//! snapshot and presets used by the CLI.

use std::io::Write;

use stripping_guide::config::validation::validate_unknown_keys;
use stripping_guide::config::{ConfigError, GuideConfig, OutputFormat, Preset};
use stripping_guide::guide::{Snapshot, SnapshotUpdate};
use stripping_guide::{evaluate, Direction, PressureState, Scenario};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn full_config_loads_from_file() {
    let file = write_config(
        r#"
[simulation]
scenario = 2
direction = "pooh"
passing_joint = true

[simulation.initial_pressures]
p0 = 0.0
p1 = 0.0
p2 = 4.6
p3 = 5.0

[presets.fault]
p0 = 1.0
p1 = 1.0
p2 = 6.0
p3 = 6.0

[output]
format = "json"
show_inactive = true
"#,
    );

    let config = GuideConfig::load_from_file(file.path()).expect("config should load");
    assert_eq!(config.simulation.scenario, Scenario::DoubleRam);
    assert_eq!(config.simulation.direction, Direction::Pooh);
    assert!(config.simulation.passing_joint);
    assert_eq!(config.output.format, OutputFormat::Json);
    assert!(config.output.show_inactive);
    assert_eq!(config.preset(Preset::Fault), PressureState::new(1.0, 1.0, 6.0, 6.0));
    // untouched preset keeps its default
    assert_eq!(config.preset(Preset::Normal), PressureState::new(0.0, 0.0, 0.0, 5.0));

    let eval = evaluate(&Snapshot::from_config(&config));
    assert!(eval.valves.lower_ram_open);
    assert!(!eval.valves.upper_ram_open);
}

#[test]
fn unknown_scenario_in_file_is_rejected() {
    let file = write_config("[simulation]\nscenario = 0\n");
    let result = GuideConfig::load_from_file(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_, _))));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = GuideConfig::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_, _))));
}

#[test]
fn typo_keys_warn_but_still_load() {
    let raw = "[simulation]\nsenario = 3\n\n[output]\nformat = \"text\"\n";
    let warnings = validate_unknown_keys(raw);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("simulation.scenario"));

    let file = write_config(raw);
    let config = GuideConfig::load_from_file(file.path()).expect("typos are not fatal");
    assert_eq!(config.simulation.scenario, Scenario::DirectPush);
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("guide_config.toml");

    let mut config = GuideConfig::default();
    config.simulation.scenario = Scenario::AnnularRamHybrid;
    config.simulation.initial_pressures = PressureState::new(0.0, 0.0, 5.0, 5.0);
    config.save_to_file(&path).expect("save");

    let loaded = GuideConfig::load_from_file(&path).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn stdin_style_updates_drive_the_snapshot() {
    let config = GuideConfig::default();
    let mut snapshot = Snapshot::from_config(&config);

    let lines = [
        r#"{"scenario": 2}"#,
        r#"{"passing_joint": true}"#,
        "",
        r#"{"p2": 4.0}"#,
    ];
    for line in lines {
        if let Some(update) = SnapshotUpdate::parse_line(line).expect("valid line") {
            snapshot.apply(&update, &config.presets);
        }
    }

    assert_eq!(snapshot.scenario, Scenario::DoubleRam);
    assert_eq!(snapshot.pressures, PressureState::new(0.0, 0.0, 4.0, 5.0));
    let eval = evaluate(&snapshot);
    assert!(eval.valves.upper_ram_open);
    assert!(!eval.valves.lower_ram_open);
    assert_eq!(eval.current_steps, vec!["s2.balance-needed".to_string()]);
}
