//! CLI integration tests for the `appraise` subcommands.
//!
//! Uses `assert_cmd` to spawn the binary and check exit codes, stdout
//! and stderr. Every test runs from the workspace root so the paths under
//! `fixtures/` resolve.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

fn appraise() -> Command {
    let mut cmd = cargo_bin_cmd!("appraise");
    cmd.current_dir(workspace_root());
    cmd.env_remove("APPRAISE_LOG");
    cmd
}

/// Generate a SAG form from the fixtures into `dir/form.json`.
fn generate_form(dir: &TempDir) -> PathBuf {
    let form = dir.path().join("form.json");
    appraise()
        .args([
            "generate",
            "--method",
            "SAG",
            "--template",
            "fixtures/template.json",
            "--surveys",
            "fixtures/surveys.json",
            "--property",
            "fixtures/property.json",
            "--out",
        ])
        .arg(&form)
        .assert()
        .success();
    form
}

fn read_document(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).unwrap_or_else(|e| panic!("read {:?}: {}", path, e));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("parse {:?}: {}", path, e))
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    appraise()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Price-analysis form recalculation engine",
        ));
}

#[test]
fn version_exits_0() {
    appraise()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("appraise"));
}

// ──────────────────────────────────────────────
// 2. generate
// ──────────────────────────────────────────────

#[test]
fn generate_prints_document_to_stdout() {
    appraise()
        .args([
            "generate",
            "--method",
            "sag",
            "--template",
            "fixtures/template.json",
            "--surveys",
            "fixtures/surveys.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"method\": \"SAG\""))
        .stdout(predicate::str::contains("\"finalValue\": 1085000"))
        .stdout(predicate::str::contains("\"overridden\": []"));
}

#[test]
fn generate_to_file_prints_summary() {
    let dir = TempDir::new().unwrap();
    let form = dir.path().join("form.json");
    appraise()
        .args([
            "generate",
            "--method",
            "DC",
            "--template",
            "fixtures/template.json",
            "--surveys",
            "fixtures/surveys.json",
            "--property",
            "fixtures/property.json",
            "--out",
        ])
        .arg(&form)
        .assert()
        .success()
        .stdout(predicate::str::contains("DC form written to"))
        .stdout(predicate::str::contains("final value:         1085000"));

    let doc = read_document(&form);
    assert_eq!(doc["method"], "DC");
    assert_eq!(
        doc["values"]["directComparisonCalculations"][0]["landAreaDeficient"],
        5
    );
}

#[test]
fn generate_json_summary() {
    let dir = TempDir::new().unwrap();
    let form = dir.path().join("form.json");
    let output = appraise()
        .args([
            "--output",
            "json",
            "generate",
            "--method",
            "SAG",
            "--template",
            "fixtures/template.json",
            "--surveys",
            "fixtures/surveys.json",
            "--out",
        ])
        .arg(&form)
        .output()
        .unwrap();
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["method"], "SAG");
    assert_eq!(summary["final_value"], 1085000);
    assert!(!summary["writes"].as_array().unwrap().is_empty());
}

#[test]
fn generate_without_surveys_fails() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.json");
    fs::write(&empty, "[]").unwrap();
    appraise()
        .args([
            "generate",
            "--method",
            "SAG",
            "--template",
            "fixtures/template.json",
            "--surveys",
        ])
        .arg(&empty)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one comparative survey"));
}

#[test]
fn unknown_method_is_rejected() {
    appraise()
        .args([
            "generate",
            "--method",
            "XYZ",
            "--template",
            "fixtures/template.json",
            "--surveys",
            "fixtures/surveys.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown valuation method"));
}

#[test]
fn missing_file_reports_json_error() {
    appraise()
        .args([
            "--output",
            "json",
            "generate",
            "--method",
            "SAG",
            "--template",
            "fixtures/template.json",
            "--surveys",
            "fixtures/no_such_file.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("surveys file not found"));
}

// ──────────────────────────────────────────────
// 3. recompute
// ──────────────────────────────────────────────

#[test]
fn recompute_of_settled_form_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let form = generate_form(&dir);
    let before = read_document(&form);
    appraise()
        .arg("recompute")
        .arg(&form)
        .args([
            "--surveys",
            "fixtures/surveys.json",
            "--property",
            "fixtures/property.json",
            "--in-place",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 writes, 0 user-owned fields skipped)"));
    assert_eq!(read_document(&form), before);
}

#[test]
fn recompute_with_unknown_survey_fails() {
    let dir = TempDir::new().unwrap();
    let form = generate_form(&dir);
    appraise()
        .arg("recompute")
        .arg(&form)
        .args(["--surveys", "fixtures/selling_surveys.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("which was not supplied"));
}

// ──────────────────────────────────────────────
// 4. edit
// ──────────────────────────────────────────────

#[test]
fn edit_sets_weight_then_reset_restores_default() {
    let dir = TempDir::new().unwrap();
    let form = generate_form(&dir);

    appraise()
        .arg("edit")
        .arg(&form)
        .args([
            "--surveys",
            "fixtures/surveys.json",
            "--set",
            "saleAdjustmentGridCalculations.1.weight=0.5",
            "--in-place",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("final value:         1295000"));

    let doc = read_document(&form);
    assert_eq!(doc["overridden"][0], "saleAdjustmentGridCalculations.1.weight");

    appraise()
        .arg("edit")
        .arg(&form)
        .args([
            "--surveys",
            "fixtures/surveys.json",
            "--reset",
            "saleAdjustmentGridCalculations.1.weight",
            "--in-place",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("final value:         1085000"));
    assert_eq!(read_document(&form)["overridden"], serde_json::json!([]));
}

#[test]
fn edit_rejects_malformed_assignment() {
    let dir = TempDir::new().unwrap();
    let form = generate_form(&dir);
    appraise()
        .arg("edit")
        .arg(&form)
        .args(["--surveys", "fixtures/surveys.json", "--set", "no-value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected PATH=VALUE"));
}

#[test]
fn edit_removes_a_survey_column() {
    let dir = TempDir::new().unwrap();
    let form = generate_form(&dir);
    let out = dir.path().join("two.json");
    appraise()
        .arg("edit")
        .arg(&form)
        .args(["--surveys", "fixtures/surveys.json", "--remove-survey", "2", "--out"])
        .arg(&out)
        .assert()
        .success();

    let doc = read_document(&out);
    let columns = doc["values"]["saleAdjustmentGridCalculations"]
        .as_array()
        .unwrap();
    assert_eq!(columns.len(), 2);
    // (1,050,000 + 1,260,000) / 2
    assert_eq!(doc["values"]["saleAdjustmentGridFinalValue"]["finalValue"], 1155000);
}

#[test]
fn edit_with_config_rounds_final_value() {
    let dir = TempDir::new().unwrap();
    let form = generate_form(&dir);
    appraise()
        .args(["--config", "fixtures/appraise.toml", "edit"])
        .arg(&form)
        .args([
            "--surveys",
            "fixtures/surveys.json",
            "--set",
            "saleAdjustmentGridCalculations.0.offeringPriceAdjustmentPct=5.5",
            "--in-place",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("final value:         1086666.67"))
        .stdout(predicate::str::contains("final value rounded: 1087000"));
}

// ──────────────────────────────────────────────
// 5. rules and validate
// ──────────────────────────────────────────────

#[test]
fn rules_lists_final_value_rule() {
    appraise()
        .args([
            "rules",
            "--method",
            "SAG",
            "--template",
            "fixtures/template.json",
            "--surveys",
            "fixtures/surveys.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("saleAdjustmentGridFinalValue.finalValue"))
        .stdout(predicate::str::contains("rules for SAG (3 columns, 2 rows)"));
}

#[test]
fn rules_json_is_an_ordered_array() {
    let output = appraise()
        .args([
            "--output",
            "json",
            "rules",
            "--method",
            "WQS",
            "--template",
            "fixtures/template.json",
            "--surveys",
            "fixtures/surveys.json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rules: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules = rules.as_array().unwrap();
    assert!(!rules.is_empty());
    for (i, rule) in rules.iter().enumerate() {
        assert_eq!(rule["position"], i);
    }
}

#[test]
fn validate_generated_form_passes() {
    let dir = TempDir::new().unwrap();
    let form = generate_form(&dir);
    appraise()
        .arg("validate")
        .arg(&form)
        .args([
            "--surveys",
            "fixtures/surveys.json",
            "--template",
            "fixtures/template.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("form is valid"));
}

#[test]
fn validate_reports_weight_sum_and_exits_1() {
    let dir = TempDir::new().unwrap();
    let form = generate_form(&dir);
    appraise()
        .arg("edit")
        .arg(&form)
        .args([
            "--surveys",
            "fixtures/surveys.json",
            "--set",
            "saleAdjustmentGridCalculations.1.weight=0.5",
            "--in-place",
            "--quiet",
        ])
        .assert()
        .success();

    appraise()
        .args(["--output", "json", "validate"])
        .arg(&form)
        .args(["--surveys", "fixtures/surveys.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\": false"))
        .stdout(predicate::str::contains("weight-sum"));
}
