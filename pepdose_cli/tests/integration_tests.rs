//! Integration tests for the pepdose binary.
//!
//! These tests verify end-to-end behavior including:
//! - Single and blend dose output (text and JSON)
//! - Validation errors surfacing as non-zero exits
//! - Saving calculations and schedules to the data directory

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from any user config
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pepdose"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"));
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("Failed to run pepdose");
    assert!(
        output.status.success(),
        "pepdose failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Peptide reconstitution and dosing calculator",
        ));
}

#[test]
fn test_dose_text_output() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args([
            "dose",
            "--vial-strength", "5",
            "--vial-unit", "mg",
            "--diluent", "2",
            "--dose", "250",
            "--dose-unit", "mcg",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draw 10 units on a u100 syringe"))
        .stdout(predicate::str::contains("Concentration: 2.5 mg/mL"))
        .stdout(predicate::str::contains("Doses per vial: 20"));
}

#[test]
fn test_dose_json_u40() {
    let temp_dir = setup_test_dir();
    let value = json_output(cli(&temp_dir).args([
        "dose",
        "--vial-strength", "5",
        "--diluent", "2",
        "--dose", "250",
        "--dose-unit", "mcg",
        "--syringe", "u40",
        "--json",
    ]));

    assert_eq!(value["units_to_draw"], 4.0);
    assert_eq!(value["concentration"], 2.5);
    assert_eq!(value["concentration_unit"], "mg/mL");
    assert_eq!(value["total_doses"], 20);
    assert_eq!(value["vial_duration"], 0.0);
}

#[test]
fn test_dose_frequency_from_catalog() {
    let temp_dir = setup_test_dir();
    // GHK-Cu is listed as "daily or EOD", which reads as daily
    let value = json_output(cli(&temp_dir).args([
        "dose",
        "--vial-strength", "5",
        "--diluent", "2",
        "--dose", "250",
        "--dose-unit", "mcg",
        "--peptide", "ghkcu",
        "--json",
    ]));
    assert_eq!(value["vial_duration"], 20.0);

    let value = json_output(cli(&temp_dir).args([
        "dose",
        "--vial-strength", "5",
        "--diluent", "2",
        "--dose", "250",
        "--dose-unit", "mcg",
        "--frequency", "eod",
        "--json",
    ]));
    assert_eq!(value["vial_duration"], 40.0);
}

#[test]
fn test_dose_rejects_zero_diluent() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["dose", "--vial-strength", "5", "--diluent", "0", "--dose", "250"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Diluent volume must be greater than 0"));
}

#[test]
fn test_dose_rejects_overdose() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args([
            "dose",
            "--vial-strength", "5",
            "--diluent", "2",
            "--dose", "6",
            "--dose-unit", "mg",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Desired dose cannot exceed vial strength"));
}

#[test]
fn test_unknown_peptide_fails() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args([
            "dose",
            "--vial-strength", "5",
            "--diluent", "2",
            "--dose", "250",
            "--peptide", "unobtainium",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unobtainium"));
}

#[test]
fn test_blend_json_breakdown() {
    let temp_dir = setup_test_dir();
    let value = json_output(cli(&temp_dir).args([
        "blend",
        "--vial-strength", "5",
        "--diluent", "2",
        "--dose", "250",
        "--dose-unit", "mcg",
        "--component", "bpc157=3mg",
        "--component", "tb500=2mg",
        "--json",
    ]));

    assert_eq!(value["total_units_to_draw"], 10.0);
    assert_eq!(value["total_doses"], 20);

    let components = value["component_results"].as_array().unwrap();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0]["peptide_name"], "BPC-157");
    assert_eq!(components[0]["percentage"], 60.0);
    assert_eq!(components[0]["amount_in_dose"], 0.15);
    assert_eq!(components[0]["unit"], "mg");
    assert_eq!(components[0]["units_to_draw"], 6.0);
    assert_eq!(components[1]["peptide_name"], "TB-500");
    assert_eq!(components[1]["percentage"], 40.0);
    assert_eq!(components[1]["units_to_draw"], 4.0);
}

#[test]
fn test_blend_text_output() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args([
            "blend",
            "--vial-strength", "5",
            "--diluent", "2",
            "--dose", "250",
            "--dose-unit", "mcg",
            "--component", "bpc157=3mg",
            "--component", "tb500=2mg",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("BPC-157: 150 mcg (60%, 6 units)"))
        .stdout(predicate::str::contains("TB-500: 100 mcg (40%, 4 units)"));
}

#[test]
fn test_blend_overage_rejected() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args([
            "blend",
            "--vial-strength", "5",
            "--diluent", "2",
            "--dose", "250",
            "--component", "bpc157=3.1mg",
            "--component", "tb500=2mg",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Component amounts exceed total vial strength"));
}

#[test]
fn test_blend_single_component_rejected() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args([
            "blend",
            "--vial-strength", "5",
            "--diluent", "2",
            "--dose", "250",
            "--component", "bpc157=5mg",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2 peptides"));
}

#[test]
fn test_library_by_category() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["library", "--category", "recovery"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BPC-157 [bpc157]"))
        .stdout(predicate::str::contains("TB-500 [tb500]"))
        .stdout(predicate::str::contains("Ipamorelin").not());
}

#[test]
fn test_save_and_history() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved calculations."));

    cli(&temp_dir)
        .args([
            "dose",
            "--vial-strength", "5",
            "--diluent", "2",
            "--dose", "250",
            "--dose-unit", "mcg",
            "--save", "bpc morning",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Calculation saved"));

    let stored = temp_dir.path().join("data").join("calculations.json");
    let contents = fs::read_to_string(&stored).expect("Failed to read saved calculations");
    assert!(contents.contains("bpc morning"));

    cli(&temp_dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bpc morning: 10 units (2.5 mg/mL), 20 doses"));
}

#[test]
fn test_schedule_save_csv_and_due() {
    let temp_dir = setup_test_dir();
    let csv_path = temp_dir.path().join("schedule.csv");

    cli(&temp_dir)
        .args([
            "schedule",
            "--peptide", "tb500",
            "--dose", "2.5",
            "--dose-unit", "mg",
            "--weeks", "2",
            "--frequency", "weekly",
            "--start", "2020-01-06T09:00:00Z",
            "--save",
            "--csv",
        ])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 injections from 2020-01-06 to 2020-01-20"))
        .stdout(predicate::str::contains("2020-01-13 09:00"))
        .stdout(predicate::str::contains("Schedule saved"));

    let csv = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert_eq!(csv.lines().count(), 3);

    // Both injections are long past their grace window
    cli(&temp_dir)
        .args(["due"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OVERDUE").count(2));
}

#[test]
fn test_due_with_nothing_stored() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["due"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing due."));
}

fn stored_ids(temp_dir: &TempDir, file: &str) -> Vec<String> {
    let path = temp_dir.path().join("data").join(file);
    let contents = fs::read_to_string(&path).expect("Failed to read store file");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("store file is not JSON");
    value
        .as_array()
        .expect("store file is not a list")
        .iter()
        .map(|entry| entry["id"].as_str().expect("entry has no id").to_string())
        .collect()
}

fn save_past_schedule(temp_dir: &TempDir) {
    cli(temp_dir)
        .args([
            "schedule",
            "--peptide", "tb500",
            "--dose", "2.5",
            "--dose-unit", "mg",
            "--weeks", "2",
            "--frequency", "weekly",
            "--start", "2020-01-06T09:00:00Z",
            "--save",
        ])
        .assert()
        .success();
}

#[test]
fn test_dose_count_exact_across_units() {
    let temp_dir = setup_test_dir();
    // 161 mg / 4025 mcg is exactly 40 doses
    let value = json_output(cli(&temp_dir).args([
        "dose",
        "--vial-strength", "161",
        "--vial-unit", "mg",
        "--diluent", "2",
        "--dose", "4025",
        "--dose-unit", "mcg",
        "--json",
    ]));
    assert_eq!(value["total_doses"], 40);
}

#[test]
fn test_schedule_rejects_huge_cycle() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args([
            "schedule",
            "--peptide", "bpc157",
            "--dose", "250",
            "--weeks", "1000000000",
            "--frequency", "daily",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_huge_grace_period_in_config_rejected() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config").join("pepdose");
    fs::create_dir_all(&config_dir).expect("Failed to create config dir");
    fs::write(
        config_dir.join("config.toml"),
        "[schedule]\ngrace_period_minutes = 9223372036854775807\n",
    )
    .expect("Failed to write config");

    cli(&temp_dir)
        .args(["due"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("grace_period_minutes"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_complete_and_skip_clear_overdue() {
    let temp_dir = setup_test_dir();
    save_past_schedule(&temp_dir);
    let ids = stored_ids(&temp_dir, "injections.json");
    assert_eq!(ids.len(), 2);

    cli(&temp_dir)
        .args(["complete", &ids[0]])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked completed"));

    cli(&temp_dir)
        .args(["due"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OVERDUE").count(1))
        .stdout(predicate::str::contains(ids[1].as_str()));

    cli(&temp_dir)
        .args(["skip", &ids[1]])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked skipped"));

    cli(&temp_dir)
        .args(["due"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing due."));

    cli(&temp_dir)
        .args(["due", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPLETED"))
        .stdout(predicate::str::contains("SKIPPED"));

    let stored = fs::read_to_string(temp_dir.path().join("data").join("injections.json"))
        .expect("Failed to read injections");
    assert!(stored.contains("completed_at"));
}

#[test]
fn test_cancel_injection() {
    let temp_dir = setup_test_dir();
    save_past_schedule(&temp_dir);
    let ids = stored_ids(&temp_dir, "injections.json");

    cli(&temp_dir)
        .args(["cancel", &ids[0]])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));
    assert_eq!(stored_ids(&temp_dir, "injections.json"), vec![ids[1].clone()]);

    cli(&temp_dir)
        .args(["cancel", &ids[0]])
        .assert()
        .failure()
        .stderr(predicate::str::contains(ids[0].as_str()));
}

#[test]
fn test_complete_rejects_bad_id() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["complete", "not-a-uuid"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_history_delete() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args([
            "dose",
            "--vial-strength", "5",
            "--diluent", "2",
            "--dose", "250",
            "--save", "to delete",
        ])
        .assert()
        .success();
    let ids = stored_ids(&temp_dir, "calculations.json");

    cli(&temp_dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains(ids[0].as_str()));

    cli(&temp_dir)
        .args(["history", "--delete", &ids[0]])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    cli(&temp_dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved calculations."));
}

#[test]
fn test_library_search() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["library", "--search", "thymosin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TB-500 [tb500]"))
        .stdout(predicate::str::contains("BPC-157").not());

    cli(&temp_dir)
        .args(["library", "--search", "insulin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching peptides."));
}

#[test]
fn test_library_details() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["library", "--id", "ghkcu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Copper Peptide"))
        .stdout(predicate::str::contains("Promotes collagen production"))
        .stdout(predicate::str::contains("Copper sensitivity"))
        .stdout(predicate::str::contains("Reconstitution:"));
}
