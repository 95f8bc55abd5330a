//! CLI smoke tests for the non-interactive commands

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir};

/// Command with an isolated config file and log directory
fn umbra(config: &NamedTempFile, data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("umbra").unwrap();
    cmd.env("XDG_DATA_HOME", data_dir.path())
        .env("UMBRA_CLI_TEST_KEY", "")
        .arg("--config")
        .arg(config.path());
    cmd
}

fn config_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

const OFFLINE_CONFIG: &str = r#"
llm:
  api-key-env: UMBRA_CLI_TEST_KEY
narrative:
  enabled: false
"#;

#[test]
fn test_inspect_midpoint_json() {
    let config = config_file(OFFLINE_CONFIG);
    let data = TempDir::new().unwrap();

    let output = umbra(&config, &data)
        .args(["inspect", "0.5", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["phase"], "totality");
    assert_eq!(value["phase_index"], 3);
    assert_eq!(value["visuals"]["is_totality"], true);
    assert_eq!(value["visuals"]["coverage"], 1.0);
}

#[test]
fn test_inspect_text() {
    let config = config_file(OFFLINE_CONFIG);
    let data = TempDir::new().unwrap();

    umbra(&config, &data)
        .args(["inspect", "0.1"])
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Before"))
        .stdout(predicate::str::contains("coverage"));
}

#[test]
fn test_phases_lists_all_six() {
    let config = config_file(OFFLINE_CONFIG);
    let data = TempDir::new().unwrap();

    let output = umbra(&config, &data)
        .args(["phases", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let phases: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(phases.len(), 6);
    assert_eq!(phases[0]["key"], "before");
    assert_eq!(phases[5]["key"], "afterglow");
    assert_eq!(phases[5]["jump_target"], 1.0);
    assert!(phases[3]["caption"]["sentence"].as_str().is_some_and(|s| !s.is_empty()));
}

#[test]
fn test_narrate_offline_prints_builtin() {
    let config = config_file(OFFLINE_CONFIG);
    let data = TempDir::new().unwrap();

    umbra(&config, &data)
        .arg("narrate")
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in"))
        .stdout(predicate::str::contains("Return of Light"));
}

#[test]
fn test_invalid_dilation_is_rejected() {
    let config = config_file(
        r#"
dilation:
  totality-proximity: 0.2
  approach-proximity: 0.1
"#,
    );
    let data = TempDir::new().unwrap();

    umbra(&config, &data)
        .arg("phases")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_log_file_written() {
    let config = config_file(OFFLINE_CONFIG);
    let data = TempDir::new().unwrap();

    umbra(&config, &data)
        .args(["--log-level", "debug", "phases"])
        .assert()
        .success();

    let log = std::fs::read_to_string(data.path().join("umbra/logs/umbra.log")).unwrap();
    assert!(log.contains("Logging initialized"));
}
