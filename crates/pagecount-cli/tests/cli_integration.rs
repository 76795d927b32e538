//! Integration tests for pagecount-cli
//!
//! These tests verify the CLI commands work end-to-end.
//! Tests run serially to avoid database lock conflicts.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the pagecount binary
fn pagecount() -> Command {
    Command::cargo_bin("pagecount").unwrap()
}

/// Command bound to a database and config inside `dir`
fn pagecount_in(dir: &TempDir) -> Command {
    let mut cmd = pagecount();
    cmd.env("PAGECOUNT_DB_PATH", dir.path().join("pagecount.db"))
        .env("PAGECOUNT_CONFIG", dir.path().join("pagecount.json"))
        .env_remove("RUST_LOG");
    cmd
}

/// One enterprise, area, printer and user with readings around March 2025
fn seed(dir: &TempDir) {
    let steps = [
        "catalog add-enterprise Acme --order 1",
        "catalog add-area Sales --order 1",
        "catalog add-printer 10.0.0.1 -e 1 -a 1",
        "catalog add-user 101 ana",
        "counters add -p 1 -u 1 -d 2025-02-28 -t 19:00 \
         --copier-bw 100 --copier-color 10 --printer-bw 10",
        "counters add -p 1 -u 1 -d 2025-03-31 -t 19:00 \
         --copier-bw 140 --copier-color 14 --printer-bw 20",
    ];

    for step in steps {
        pagecount_in(dir)
            .args(step.split_whitespace())
            .assert()
            .success();
    }
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
#[serial]
fn test_cli_help() {
    pagecount()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pagecount"))
        .stdout(predicate::str::contains("COMMAND").or(predicate::str::contains("Commands")));
}

#[test]
#[serial]
fn test_cli_version() {
    pagecount()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pagecount"));
}

#[test]
#[serial]
fn test_report_help() {
    pagecount()
        .args(["report", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("summary"))
        .stdout(predicate::str::contains("usage"))
        .stdout(predicate::str::contains("detail"));
}

#[test]
#[serial]
fn test_report_summary_help() {
    pagecount()
        .args(["report", "summary", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--thru"));
}

#[test]
#[serial]
fn test_counters_help() {
    pagecount()
        .args(["counters", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set-total"));
}

#[test]
#[serial]
fn test_catalog_help() {
    pagecount()
        .args(["catalog", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("add-printer"));
}

// =============================================================================
// Argument Validation Tests
// =============================================================================

#[test]
#[serial]
fn test_invalid_format() {
    pagecount()
        .args(["--format", "csv", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
#[serial]
fn test_invalid_interval() {
    pagecount()
        .args(["report", "summary", "--interval", "fortnight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid interval"));
}

#[test]
#[serial]
fn test_interval_conflicts_with_dates() {
    pagecount()
        .args("report summary --interval last-month --from 2025-03-01".split_whitespace())
        .assert()
        .failure();
}

// =============================================================================
// End-to-end Tests
// =============================================================================

#[test]
#[serial]
fn test_config_show_uses_env_paths() {
    let dir = TempDir::new().unwrap();
    pagecount_in(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("database.path"))
        .stdout(predicate::str::contains("pagecount.db"));
}

#[test]
#[serial]
fn test_config_show_reports_flag_config_file() {
    let dir = TempDir::new().unwrap();
    let custom = dir.path().join("custom.json");
    std::fs::write(&custom, r#"{"log": {"level": "info"}}"#).unwrap();

    pagecount()
        .env("PAGECOUNT_DB_PATH", dir.path().join("pagecount.db"))
        .env_remove("PAGECOUNT_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&custom)
        .args("config show --format json".split_whitespace())
        .assert()
        .success()
        .stdout(predicate::str::contains(custom.to_str().unwrap()))
        .stdout(predicate::str::contains("\"source\": \"flag\""))
        .stdout(predicate::str::contains("\"value\": \"info\""));
}

#[test]
#[serial]
fn test_counters_add_echoes_reading() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    pagecount_in(&dir)
        .args("counters add -p 1 -u 1 -d 2025-04-01 -t 08:15 --copier-bw 150".split_whitespace())
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored reading for printer 1 / user 1"))
        .stdout(predicate::str::contains("2025-04-01"))
        .stdout(predicate::str::contains("08:15:00"));
}

#[test]
#[serial]
fn test_report_summary_json() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    pagecount_in(&dir)
        .args("report summary --from 2025-03-01 --thru 2025-03-31 --format json".split_whitespace())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"label\": \"2025-03\""))
        .stdout(predicate::str::contains("\"monochrome\": 50"))
        .stdout(predicate::str::contains("\"color\": 4"));
}

#[test]
#[serial]
fn test_report_summary_table() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    pagecount_in(&dir)
        .args("report summary --from 2025-03-01 --thru 2025-03-31".split_whitespace())
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme / Sales"))
        .stdout(predicate::str::contains("Total: 50 monochrome, 4 color"));
}

#[test]
#[serial]
fn test_report_detail_lists_readings() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    pagecount_in(&dir)
        .args("report detail --from 2025-03-01 --thru 2025-03-31".split_whitespace())
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-02-28 100/10/10/0"))
        .stdout(predicate::str::contains("40/4/10/0"));
}

#[test]
#[serial]
fn test_report_empty_period() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    pagecount_in(&dir)
        .args("report usage --from 2024-01-01 --thru 2024-01-31".split_whitespace())
        .assert()
        .success()
        .stdout(predicate::str::contains("No items found."));
}

#[test]
#[serial]
fn test_set_total_unknown_printer() {
    let dir = TempDir::new().unwrap();
    pagecount_in(&dir)
        .args(["counters", "set-total", "-p", "99", "-c", "1000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
#[serial]
fn test_set_total_shows_in_printer_list() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    pagecount_in(&dir)
        .args(["counters", "set-total", "-p", "1", "-c", "48213"])
        .assert()
        .success();

    pagecount_in(&dir)
        .args(["catalog", "printers", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"counter\": 48213"));
}
