//! CLI integration tests for dbdeploy.
//!
//! These tests verify command-line argument parsing, help output,
//! exit codes, and offline script generation.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Get a command for the dbdeploy binary.
fn cmd() -> Command {
    Command::cargo_bin("dbdeploy").unwrap()
}

/// Write a scripts tree and a config pointing at it; returns the config path.
fn offline_project(dir: &Path, dialect: &str, extra: &str) -> String {
    let scripts = dir.join("scripts");
    fs::create_dir_all(scripts.join("v1.0")).unwrap();
    fs::create_dir_all(scripts.join("v2.0")).unwrap();
    fs::write(scripts.join("v1.0/001_create_users.sql"), "CREATE TABLE users (id INT)").unwrap();
    fs::write(scripts.join("v1.0/002_add_email.sql"), "ALTER TABLE users ADD email VARCHAR(100)").unwrap();
    fs::write(scripts.join("v2.0/001_create_orders.sql"), "CREATE TABLE orders (id INT)").unwrap();

    let config = dir.join("dbdeploy.yaml");
    let mut file = fs::File::create(&config).unwrap();
    writeln!(file, "dialect: {}", dialect).unwrap();
    writeln!(file, "scripts_dir: {}", scripts.display()).unwrap();
    write!(file, "{}", extra).unwrap();
    config.to_str().unwrap().to_string()
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
        .stdout(predicate::str::contains("pending"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("journal-ddl"))
        .stdout(predicate::str::contains("failed"));
}

#[test]
fn test_generate_subcommand_help() {
    cmd()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--last-change"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dbdeploy"));
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
        .stdout(predicate::str::contains("--output-json"))
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"))
        .stdout(predicate::str::contains("[default: dbdeploy.yaml]"));
}

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_7() {
    // Missing file is an IO error (code 7), not config error (code 1)
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "pending"])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "pending"])
        .assert()
        .code(1);
}

#[test]
fn test_empty_config_exits_with_code_1() {
    let file = tempfile::NamedTempFile::new().unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "pending"])
        .assert()
        .code(1);
}

#[test]
fn test_unknown_dialect_exits_with_code_1() {
    let dir = TempDir::new().unwrap();
    let config = offline_project(dir.path(), "db2", "");

    cmd()
        .args(["--config", &config, "pending"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported dialect 'db2'"));
}

#[test]
fn test_apply_without_connection_exits_with_code_1() {
    let dir = TempDir::new().unwrap();
    let config = offline_project(dir.path(), "pgsql", "");

    cmd()
        .args(["--config", &config, "apply"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("connection"));
}

#[test]
fn test_missing_scripts_dir_exits_with_code_5() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("dbdeploy.yaml");
    fs::write(
        &config,
        format!("dialect: mssql\nscripts_dir: {}\n", dir.path().join("absent").display()),
    )
    .unwrap();

    cmd()
        .args(["--config", config.to_str().unwrap(), "pending"])
        .assert()
        .code(5);
}

// =============================================================================
// Offline Generation Tests
// =============================================================================

#[test]
fn test_pending_lists_scripts_in_order() {
    let dir = TempDir::new().unwrap();
    let config = offline_project(dir.path(), "mssql", "");

    cmd()
        .args(["--config", &config, "pending"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            "(?s)v1.0/001_create_users.sql.*v1.0/002_add_email.sql.*v2.0/001_create_orders.sql",
        )
        .unwrap());
}

#[test]
fn test_generate_to_stdout() {
    let dir = TempDir::new().unwrap();
    let config = offline_project(dir.path(), "mssql", "");

    cmd()
        .args(["--config", &config, "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-- START CHANGE SCRIPT v1.0/001_create_users.sql"))
        .stdout(predicate::str::contains("INSERT INTO [ChangeLog]"))
        .stdout(predicate::str::contains("CREATE TABLE users (id INT)\nGO"))
        .stdout(predicate::str::contains("-- END CHANGE SCRIPT v2.0/001_create_orders.sql"));
}

#[test]
fn test_generate_respects_last_change() {
    let dir = TempDir::new().unwrap();
    let config = offline_project(dir.path(), "pgsql", "last_change_to_apply: v2.0/1\n");

    cmd()
        .args(["--config", &config, "generate", "--last-change", "v1.0/1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE users (id INT);"))
        .stdout(predicate::str::contains("ALTER TABLE users").not())
        .stdout(predicate::str::contains("orders").not());
}

#[test]
fn test_generate_to_file_with_json_report() {
    let dir = TempDir::new().unwrap();
    let config = offline_project(dir.path(), "mysql", "create_journal_table: true\n");
    let output = dir.path().join("out/deploy.sql");

    cmd()
        .args([
            "--config",
            &config,
            "--output-json",
            "generate",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dialect\": \"mysql\""))
        .stdout(predicate::str::contains("\"journal_table_created\": true"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("CREATE TABLE `ChangeLog`"));
    assert!(text.contains("CREATE TABLE orders (id INT);"));
}

#[test]
fn test_generate_json_requires_output_file() {
    let dir = TempDir::new().unwrap();
    let config = offline_project(dir.path(), "mssql", "");

    cmd()
        .args(["--config", &config, "--output-json", "generate"])
        .assert()
        .code(1);
}

#[test]
fn test_journal_ddl() {
    let dir = TempDir::new().unwrap();
    let config = offline_project(dir.path(), "ora", "journal_table: deploy.change_log\n");

    cmd()
        .args(["--config", &config, "journal-ddl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE \"deploy\".\"change_log\""));
}

#[test]
fn test_failed_offline_reports_none() {
    let dir = TempDir::new().unwrap();
    let config = offline_project(dir.path(), "firebird", "");

    cmd()
        .args(["--config", &config, "failed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No failed changes"));
}
