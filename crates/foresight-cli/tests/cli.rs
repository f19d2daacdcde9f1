//! Binary-level tests for the `foresight` command.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const SESSION: &str = r#"
title: AI strategy 2030
drivers:
  - name: AI Progress
    states: [Breakthrough, Incremental]
    uncertainty: high
    impact: high
  - name: Regulation
    states: [Heavy, Light]
    uncertainty: medium
    impact: high
scenarios:
  - states: [Breakthrough, Light]
    name: Tech Utopia
signposts:
  - description: Compute cost halves
    target: Tech Utopia
    weight: 0.4
strategies:
  - name: Automate
    weight: 0.8
  - name: Hedge
    weight: 0.8
"#;

fn session_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn foresight() -> Command {
    let mut cmd = Command::cargo_bin("foresight").unwrap();
    cmd.env("FORESIGHT_CONFIG", "/nonexistent/foresight/config.toml")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn workshop_prints_agenda() {
    foresight()
        .args(["workshop", "--participants", "12", "--duration", "2h", "--domain", "energy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scenario workshop: energy"))
        .stdout(predicate::str::contains("3 breakout group(s)"))
        .stdout(predicate::str::contains("Narratives"));
}

#[test]
fn workshop_json_allocates_whole_duration() {
    let output = foresight()
        .args(["--output", "json", "workshop", "-p", "7", "-d", "90min", "--domain", "health"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let agenda: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(agenda["breakout_groups"], 2);
    let minutes: u64 = agenda["phases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["minutes"].as_u64().unwrap())
        .sum();
    assert_eq!(minutes, 90);
}

#[test]
fn workshop_rejects_zero_participants() {
    foresight()
        .args(["workshop", "--participants", "0", "--duration", "2h", "--domain", "energy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one participant"));
}

#[test]
fn workshop_rejects_unparseable_duration() {
    foresight()
        .args(["workshop", "--participants", "4", "--duration", "soon", "--domain", "energy"])
        .assert()
        .failure();
}

#[test]
fn matrix_lists_named_scenarios() {
    let file = session_file(SESSION);
    foresight()
        .arg("matrix")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tech Utopia"))
        .stdout(predicate::str::contains("Incremental / Heavy"))
        .stdout(predicate::str::contains("25.0%"));
}

#[test]
fn track_applies_triggers() {
    let file = session_file(SESSION);
    foresight()
        .arg("track")
        .arg(file.path())
        .args(["--trigger", "Compute cost halves"])
        .assert()
        .success()
        .stdout(predicate::str::contains("46.4%"))
        .stdout(predicate::str::contains("17.9%"));
}

#[test]
fn track_unknown_signpost_fails() {
    let file = session_file(SESSION);
    foresight()
        .arg("track")
        .arg(file.path())
        .args(["--trigger", "Aliens land"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn stress_requires_normalized_weights_unless_told_otherwise() {
    let file = session_file(SESSION);
    foresight()
        .arg("stress")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));

    foresight()
        .arg("stress")
        .arg(file.path())
        .args(["--mode", "independent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Most robust"));
}

#[test]
fn report_fails_on_unnormalized_portfolio() {
    let file = session_file(SESSION);
    foresight()
        .arg("report")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn report_json_contains_session() {
    let balanced = SESSION.replace("weight: 0.8", "weight: 0.5");
    let file = session_file(&balanced);
    let output = foresight()
        .args(["-o", "json", "report"])
        .arg(file.path())
        .args(["--trigger", "Compute cost halves"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["title"], "AI strategy 2030");
    assert_eq!(report["scenarios"].as_array().unwrap().len(), 4);
    assert_eq!(report["robustness"]["strategies"].as_array().unwrap().len(), 2);
}

#[test]
fn drivers_json_ranks_by_criticality() {
    let file = session_file(SESSION);
    let output = foresight()
        .args(["-o", "json", "drivers"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["driver"], "AI Progress");
    assert_eq!(rows[0]["criticality"], 9);
    assert_eq!(rows[1]["role"], "axis");
}

#[test]
fn unsupported_session_extension_fails() {
    let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
    file.write_all(SESSION.as_bytes()).unwrap();
    foresight()
        .arg("matrix")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported session file extension"));
}

#[test]
fn config_reads_file() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "default_domain = \"logistics\"\ngroup_size = 3").unwrap();
    foresight()
        .env("FORESIGHT_CONFIG", config.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("logistics"));
}

#[test]
fn report_and_stress_share_configured_mode() {
    let file = session_file(SESSION);
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "mode = \"independent\"").unwrap();

    for command in ["stress", "report"] {
        foresight()
            .env("FORESIGHT_CONFIG", config.path())
            .arg(command)
            .arg(file.path())
            .assert()
            .success();
    }

    foresight()
        .env("FORESIGHT_CONFIG", config.path())
        .arg("report")
        .arg(file.path())
        .args(["--mode", "normalized"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}
