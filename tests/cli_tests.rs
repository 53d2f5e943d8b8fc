//! Binary tests for the savings-dashboard command.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const CSV: &str = "Sprint,Start Date,End Date,Inference Type,Region,Cloud Provider,\
Current Monthly Cost ($),Est. Monthly Cost ($),Cost Savings in $,Cost Savings in %,\
Achieved Savings,Unachieveable Savings,Delayed Savings,Initiated
S1,2024-05-01,2024-05-31,Rightsizing,us-east-1,AWS,1000,800,200,20,200,0,0,0
S1,2024-02-01,2024-02-28,Scheduling,us-east-1,AWS,2000,2000,0,0,0,0,0,500
S2,2024-07-10,2024-07-31,Rightsizing,eu-west-1,GCP,500,400,100,20,0,0,100,0
";

fn fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("report.csv");
    std::fs::write(&path, CSV).unwrap();
    path
}

fn dashboard() -> Command {
    let mut cmd = Command::cargo_bin("savings-dashboard").unwrap();
    cmd.env_remove("SAVINGS_DASHBOARD_FILE").env_remove("RUST_LOG");
    cmd
}

#[test]
fn text_report_shows_kpis() {
    let dir = TempDir::new().unwrap();
    dashboard()
        .arg(fixture(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Recommendations   3"))
        .stdout(predicate::str::contains("Total Savings ($)       $300"))
        .stdout(predicate::str::contains("Sprint Summary"));
}

#[test]
fn filters_narrow_the_report() {
    let dir = TempDir::new().unwrap();
    dashboard()
        .arg(fixture(&dir))
        .args(["--fy", "FY2025", "--sprint", "S1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Recommendations   1"))
        .stdout(predicate::str::contains("Total Savings (%)       20.0%"));
}

#[test]
fn json_output_is_parseable() {
    let dir = TempDir::new().unwrap();
    let output = dashboard()
        .arg(fixture(&dir))
        .args(["--format", "json", "--month", "7"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kpis"]["total_recommendations"], 1);
    assert_eq!(value["selection"]["month"], 7);
    assert_eq!(value["charts"]["by_sprint"]["sprints"][0], "S2");
}

#[test]
fn invalid_month_is_rejected() {
    let dir = TempDir::new().unwrap();
    dashboard()
        .arg(fixture(&dir))
        .args(["--month", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("month must be between 1 and 12"));
}

#[test]
fn missing_file_fails_with_message() {
    let dir = TempDir::new().unwrap();
    dashboard()
        .arg(dir.path().join("nope.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}

#[test]
fn env_supplies_default_file() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);
    dashboard()
        .env("SAVINGS_DASHBOARD_FILE", &path)
        .arg("--list-options")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sprint: S1, S2"))
        .stdout(predicate::str::contains("FY:     FY2024, FY2025"));
}

#[test]
fn exports_sprint_summary() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("summary.csv");
    dashboard()
        .arg(fixture(&dir))
        .arg("--export-summary")
        .arg(&out)
        .assert()
        .success();
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("Sprint,Total_Recommendations"));
    assert_eq!(written.lines().count(), 3);
}
