//! CLI integration tests for dbschema.
//!
//! These tests verify command-line argument parsing, help output,
//! and exit codes for various error conditions. Database-backed tests use an
//! in-memory SQLite database so they need no server.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the dbschema binary.
fn cmd() -> Command {
    Command::cargo_bin("dbschema").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("schemas"))
        .stdout(predicate::str::contains("health-check"));
}

#[test]
fn test_inspect_subcommand_help() {
    cmd()
        .args(["inspect", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--table"))
        .stdout(predicate::str::contains("[SCHEMA]"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dbschema"));
}

// =============================================================================
// Global Flags Tests
// =============================================================================

#[test]
fn test_global_flags_exist() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--output-json"))
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"));
}

#[test]
fn test_config_default_path() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: config.yaml]"));
}

#[test]
fn test_short_config_flag() {
    // -c should work as short for --config
    cmd()
        .args(["-c", "some_config.yaml", "--help"])
        .assert()
        .success();
}

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

// =============================================================================
// Exit Code Tests - Config Errors (Exit Code 1) and IO Errors (Exit Code 7)
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_7() {
    // Missing file is an IO error (code 7), not config error (code 1)
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "health-check"])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1);
}

#[test]
fn test_empty_config_exits_with_code_1() {
    let file = tempfile::NamedTempFile::new().unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_required_fields_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    // Valid YAML, but mysql needs host, database and user
    writeln!(file, "connection:").unwrap();
    writeln!(file, "  type: mysql").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("connection.host"));
}

#[test]
fn test_invalid_verbosity_exits_with_code_1() {
    cmd()
        .args(["--verbosity", "chatty", "--url", "sqlite::memory:", "schemas"])
        .assert()
        .code(1);
}

// =============================================================================
// Exit Code Tests - Dialect and Database Errors
// =============================================================================

#[test]
fn test_unknown_type_exits_with_code_4() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "connection:").unwrap();
    writeln!(file, "  type: oracle").unwrap();
    writeln!(file, "  host: localhost").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("oracle"));
}

#[test]
fn test_unknown_url_scheme_exits_with_code_4() {
    cmd()
        .args(["--url", "postgres://localhost/db", "health-check"])
        .assert()
        .code(4);
}

#[test]
fn test_missing_sqlite_file_exits_with_code_2() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.db");
    let url = format!("sqlite://{}", path.display());

    cmd().args(["--url", &url, "health-check"]).assert().code(2);
}

// =============================================================================
// In-memory SQLite Tests
// =============================================================================

#[test]
fn test_health_check_sqlite() {
    cmd()
        .args(["--url", "sqlite::memory:", "health-check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Driver: sqlite"))
        .stdout(predicate::str::contains("HEALTHY"));
}

#[test]
fn test_health_check_json_output() {
    cmd()
        .args(["--url", "sqlite::memory:", "--output-json", "health-check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"driver\": \"sqlite\""))
        .stdout(predicate::str::contains("\"healthy\": true"));
}

#[test]
fn test_schemas_lists_main() {
    cmd()
        .args(["--url", "sqlite::memory:", "schemas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("main"));
}

#[test]
fn test_inspect_default_schema() {
    cmd()
        .args(["--url", "sqlite::memory:", "inspect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema: main"))
        .stdout(predicate::str::contains("Tables: 0"));
}

#[test]
fn test_inspect_json_output() {
    cmd()
        .args(["--url", "sqlite::memory:", "--output-json", "inspect", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"main\""))
        .stdout(predicate::str::contains("\"tables\": []"));
}

#[test]
fn test_inspect_missing_schema_exits_with_code_3() {
    cmd()
        .args(["--url", "sqlite::memory:", "inspect", "archive"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Schema not found: archive"));
}

#[test]
fn test_inspect_missing_table_exits_with_code_3() {
    cmd()
        .args(["--url", "sqlite::memory:", "inspect", "main", "--table", "users"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Table not found: main.users"));
}

#[test]
fn test_sqlite_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "connection:").unwrap();
    writeln!(file, "  type: sqlite").unwrap();
    writeln!(file, "  path: \":memory:\"").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "schemas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("main"));
}
