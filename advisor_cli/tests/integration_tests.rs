//! Integration tests for the advisor binary.
//!
//! These tests verify end-to-end behavior including:
//! - Catalog queries (lookup, search, chain, availability)
//! - Recommendations and alternatives
//! - Recording history with the retake policy
//! - Transcript import and custom catalogs

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("advisor"))
}

/// CLI bound to `data_dir` with an empty config file in it, so the
/// user's own config never leaks into a test
fn cli_in(data_dir: &TempDir) -> Command {
    let config = data_dir.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "").expect("Failed to write config");
    }
    let mut cmd = cli();
    cmd.arg("--data-dir")
        .arg(data_dir.path())
        .arg("--config")
        .arg(config);
    cmd
}

/// Run a command against `data_dir` and parse its JSON output
fn run_json(data_dir: &TempDir, args: &[&str]) -> Value {
    let output = cli_in(data_dir)
        .args(args)
        .output()
        .expect("Failed to run advisor");
    assert!(
        output.status.success(),
        "advisor {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn codes(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["code"].as_str().expect("code").to_string())
        .collect()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Degree requirement and prerequisite advisor"));
}

#[test]
fn test_lookup_normalizes_code() {
    let temp_dir = setup_test_dir();
    let course = run_json(&temp_dir, &["lookup", "cs310"]);

    assert_eq!(course["code"], "CS 310");
    assert_eq!(course["title"], "Data Structures");
    assert_eq!(course["prerequisites"], serde_json::json!(["CS 211", "MATH 113"]));
}

#[test]
fn test_lookup_unknown_course_fails() {
    let temp_dir = setup_test_dir();
    cli_in(&temp_dir)
        .args(["lookup", "CS 999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnknownCourse"));
}

#[test]
fn test_search_by_topic() {
    let temp_dir = setup_test_dir();
    let results = run_json(&temp_dir, &["search", "data structures", "--limit", "3"]);
    let found = codes(&results);

    assert_eq!(found[0], "CS 310");
    assert!(found.len() <= 3);
}

#[test]
fn test_chain() {
    let temp_dir = setup_test_dir();
    let chain = run_json(&temp_dir, &["chain", "CS 310"]);

    assert_eq!(codes(&chain["directPrerequisites"]), vec!["CS 211", "MATH 113"]);
    assert_eq!(codes(&chain["indirectPrerequisites"]), vec!["CS 112"]);
    assert!(codes(&chain["unlockedCourses"]).contains(&"CS 321".to_string()));
}

#[test]
fn test_available_with_explicit_completed() {
    let temp_dir = setup_test_dir();
    let next = run_json(&temp_dir, &["available", "--completed", "CS 112", "--next"]);
    assert_eq!(codes(&next), vec!["CS 211", "CS 222"]);

    let blocked = run_json(&temp_dir, &["available", "--completed", "CS 211", "--blocked"]);
    let cs310 = blocked
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["course"]["code"] == "CS 310")
        .expect("CS 310 is blocked");
    assert_eq!(cs310["missingPrerequisites"], serde_json::json!(["MATH 113"]));
}

#[test]
fn test_recommend_respects_year() {
    let temp_dir = setup_test_dir();
    let recs = run_json(
        &temp_dir,
        &[
            "recommend",
            "--major",
            "Computer Science",
            "--year",
            "1",
            "--completed",
            "CS 112,CS 211,MATH 113,MATH 114,MATH 125",
            "--limit",
            "50",
        ],
    );

    let found = codes(&recs);
    assert!(!found.is_empty());
    for code in &found {
        let number: u32 = code
            .split(' ')
            .nth(1)
            .and_then(|n| n.parse().ok())
            .expect("numbered code");
        assert!(number / 100 <= 3, "{} is too advanced for year 1", code);
    }
    assert!(!found.contains(&"CS 112".to_string()));
}

#[test]
fn test_record_retake_and_summary() {
    let temp_dir = setup_test_dir();

    let first = run_json(&temp_dir, &["record", "CS 112", "D", "--semester", "Fall 2023"]);
    assert_eq!(first["countsTowardDegree"], false);

    let second = run_json(&temp_dir, &["record", "cs112", "B+", "--semester", "Spring 2024"]);
    assert_eq!(second["countsTowardDegree"], true);
    assert_eq!(second["nullified"], false);

    let history: Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("history.json")).unwrap()).unwrap();
    let records = history["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["nullified"], true);

    let summary = run_json(&temp_dir, &["summary"]);
    assert_eq!(summary["earnedCredits"], 4);
    assert_eq!(summary["nullifiedAttempts"], 1);
    assert_eq!(summary["gpa"], 3.3);
}

#[test]
fn test_remove_record() {
    let temp_dir = setup_test_dir();
    let record = run_json(&temp_dir, &["record", "MATH 113", "A", "--semester", "Fall 2023"]);
    let id = record["id"].as_str().unwrap().to_string();

    let removed = run_json(&temp_dir, &["remove", &id]);
    assert_eq!(removed["courseCode"], "MATH 113");

    let summary = run_json(&temp_dir, &["summary"]);
    assert_eq!(summary["attempts"], 0);

    cli_in(&temp_dir)
        .args(["remove", &id])
        .assert()
        .failure();
}

#[test]
fn test_record_rejects_bad_input() {
    let temp_dir = setup_test_dir();
    cli_in(&temp_dir)
        .args(["record", "CS 112", "Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidGrade"));

    cli_in(&temp_dir)
        .args(["record", "CS 999", "A"])
        .assert()
        .failure();

    assert!(!temp_dir.path().join("history.json").exists());
}

#[test]
fn test_counts_toward_degree() {
    let temp_dir = setup_test_dir();

    let decision = run_json(&temp_dir, &["counts", "CS 310", "--grade", "B"]);
    assert_eq!(decision["category"], "required_cs");
    assert_eq!(decision["countsTowardDegree"], true);

    let decision = run_json(&temp_dir, &["counts", "CS 310", "--grade", "C-"]);
    assert_eq!(decision["countsTowardDegree"], false);

    let decision = run_json(&temp_dir, &["counts", "MATH 105"]);
    assert_eq!(decision["category"], Value::Null);
    assert_eq!(decision["countsTowardDegree"], false);
}

#[test]
fn test_import_and_remaining() {
    let temp_dir = setup_test_dir();
    let transcript = temp_dir.path().join("transcript.csv");
    fs::write(
        &transcript,
        "course,grade,semester\nCS 112,A,Fall 2023\nMATH 113,B,Fall 2023\nBAD 1,A,Fall 2023\n",
    )
    .unwrap();

    let result = run_json(&temp_dir, &["import", transcript.to_str().unwrap()]);
    assert_eq!(result["imported"], 2);
    assert_eq!(result["records"], 2);

    let remaining = run_json(&temp_dir, &["remaining"]);
    let left: Vec<&str> = remaining["remaining"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert!(!left.contains(&"CS 112"));
    assert!(!left.contains(&"MATH 113"));
    assert!(left.contains(&"CS 310"));
    assert_eq!(remaining["summary"]["earnedCredits"], 8);

    // history now drives availability
    let next = run_json(&temp_dir, &["available", "--next"]);
    assert!(codes(&next).contains(&"CS 211".to_string()));
}

#[test]
fn test_custom_catalog_and_validate() {
    let temp_dir = setup_test_dir();
    let catalog = temp_dir.path().join("catalog.json");
    fs::write(
        &catalog,
        r#"[
            {"code": "A 100", "title": "Alpha", "credits": 3, "prerequisites": ["B 100"]},
            {"code": "B 100", "title": "Beta", "credits": 3, "prerequisites": ["A 100"]}
        ]"#,
    )
    .unwrap();

    let lookup = run_json(&temp_dir, &["--catalog", catalog.to_str().unwrap(), "lookup", "a100"]);
    assert_eq!(lookup["subject"], "A");

    cli_in(&temp_dir)
        .arg("--catalog")
        .arg(&catalog)
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Prerequisite cycle"));
}

#[test]
fn test_config_file_drives_defaults() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[student]\nyear = 1\n\n[ranking]\ndefault_limit = 2\n",
    )
    .unwrap();

    let recs = run_json(&temp_dir, &["recommend", "--completed", "CS 112"]);
    assert_eq!(codes(&recs).len(), 2);
}

#[test]
fn test_remove_retake_reinstates_earlier_attempt() {
    let temp_dir = setup_test_dir();
    let first = run_json(&temp_dir, &["record", "CS 112", "C", "--semester", "Fall 2023"]);
    let retake = run_json(&temp_dir, &["record", "CS 112", "A", "--semester", "Spring 2024"]);
    run_json(&temp_dir, &["remove", retake["id"].as_str().unwrap()]);

    let history: Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("history.json")).unwrap()).unwrap();
    let records = history["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], first["id"]);
    assert_eq!(records[0]["nullified"], false);
    assert_eq!(records[0]["countsTowardDegree"], true);

    let summary = run_json(&temp_dir, &["summary"]);
    assert_eq!(summary["earnedCredits"], 4);
    assert_eq!(summary["nullifiedAttempts"], 0);
}

#[test]
fn test_builtin_catalog_validates() {
    let temp_dir = setup_test_dir();
    let report = run_json(&temp_dir, &["validate"]);
    assert_eq!(report["errors"], serde_json::json!([]));
    assert!(report["courses"].as_u64().unwrap() > 50);
}
