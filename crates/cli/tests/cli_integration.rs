//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `careline` binary and verify
//! exit codes, stdout content, and stderr content.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper: create a Command for the `careline` binary with a clean environment.
fn careline() -> Command {
    let mut cmd = cargo_bin_cmd!("careline");
    cmd.env_remove("CARELINE_SEED")
        .env_remove("CARELINE_DEBUG")
        .env_remove("RUST_LOG");
    cmd
}

fn generate_json(args: &[&str]) -> serde_json::Value {
    let output = careline()
        .arg("generate")
        .args(args)
        .output()
        .expect("run careline");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    careline()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Synthetic health-coaching journey generator",
        ));
}

#[test]
fn version_exits_0() {
    careline()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("careline"));
}

#[test]
fn unknown_subcommand_fails() {
    careline().arg("simulate").assert().failure();
}

// ──────────────────────────────────────────────
// 2. generate
// ──────────────────────────────────────────────

#[test]
fn generate_with_seed_is_reproducible() {
    let a = generate_json(&["--seed", "42"]);
    let b = generate_json(&["--seed", "42"]);
    assert_eq!(a, b);

    let events = a.as_array().expect("flat list");
    assert_eq!(events[0]["sender"], "Ruby");
    assert_eq!(events[1]["sender"], "Rohan");
    assert!(events.iter().any(|e| e["eventId"] == "evt_w10_illness"));
}

#[test]
fn generate_seed_from_env() {
    let from_flag = generate_json(&["--seed", "9", "--weeks", "4"]);
    let output = careline()
        .env("CARELINE_SEED", "9")
        .args(["generate", "--weeks", "4"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let from_env: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(from_flag, from_env);
}

#[test]
fn generate_split_output() {
    let split = generate_json(&["--seed", "3", "--weeks", "8", "--split"]);
    assert!(split["timeline_events"].is_array());
    assert!(split["chat_messages"].is_array());
    assert!(split["timeline_events"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["eventId"] == "evt_w00_baseline"));
}

#[test]
fn generate_reads_toml_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journey.toml");
    fs::write(&path, "weeks = 4\nseed = 11\n").unwrap();

    let from_file = generate_json(&["--config", path.to_str().unwrap()]);
    let from_flags = generate_json(&["--seed", "11", "--weeks", "4"]);
    assert_eq!(from_file, from_flags);

    // Flags beat the file.
    let overridden = generate_json(&["--config", path.to_str().unwrap(), "--weeks", "2"]);
    assert_ne!(overridden, from_file);
}

#[test]
fn generate_rejects_zero_weeks() {
    careline()
        .args(["generate", "--weeks", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weeks"));
}

#[test]
fn generate_reports_missing_config_as_json() {
    careline()
        .args([
            "--output",
            "json",
            "generate",
            "--config",
            "/nonexistent/careline.toml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""));
}

// ──────────────────────────────────────────────
// 3. explain
// ──────────────────────────────────────────────

#[test]
fn explain_against_generated_journey() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journey.json");
    let journey = generate_json(&["--seed", "5"]);
    fs::write(&path, journey.to_string()).unwrap();

    let output = careline()
        .args([
            "--output",
            "json",
            "explain",
            "why was my training paused?",
            "--journey",
            path.to_str().unwrap(),
            "--seed",
            "1",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let explanation: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(explanation["source"], "matched");
    assert_eq!(explanation["detected_sentiment"], "curious");
    assert!(explanation["explanation"]
        .as_str()
        .unwrap()
        .starts_with("Great question. "));
}

#[test]
fn explain_text_output_synthesizes_without_match() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, "[]").unwrap();

    careline()
        .args([
            "explain",
            "I'm furious about the parking",
            "--journey",
            path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("I understand your frustration"))
        .stdout(predicate::str::contains("Neel"));
}

#[test]
fn explain_empty_query_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, "[]").unwrap();

    careline()
        .args(["explain", "", "--journey", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Query is required."));
}

#[test]
fn explain_missing_journey_file_fails() {
    careline()
        .args(["explain", "apob", "--journey", "/nonexistent/journey.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error reading"));
}
