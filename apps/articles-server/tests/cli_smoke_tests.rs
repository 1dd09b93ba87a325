//! CLI smoke tests for the articles-server binary
//!
//! These tests drive the compiled binary: help and version output, config
//! validation and a short-lived run against in-memory storage.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;

/// Helper to run the articles-server binary with given arguments
fn run_articles_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_articles-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute articles-server")
}

/// Write a config whose home_dir (and thus logs and database) lives in `dir`.
fn write_config(dir: &Path, extra: &str) -> String {
    let home = dir.join("home");
    let config_path = dir.join("config.yaml");
    let content = format!(
        r#"
server:
  home_dir: "{}"
  host: "127.0.0.1"
  port: 0

logging:
  default:
    console_level: warn
    file: "logs/articles.log"
    file_level: info
    max_backups: 1
    max_size_mb: 1
{}"#,
        home.to_string_lossy().replace('\\', "/"),
        extra
    );
    std::fs::write(&config_path, content).expect("Failed to write config file");
    config_path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_articles_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("articles-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_articles_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("articles-server"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_articles_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "stderr: {}", stderr);
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_articles_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Config file not found"),
        "Should mention config file issue: {}",
        stderr
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_articles_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        r#"
database:
  url: "sqlite://database/articles.db"

modules:
  articles:
    allow_anonymous_writes: false
    cache_max_age_secs: 120
"#,
    );

    let output = run_articles_server(&["--config", &config, "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "Should succeed with valid config: {}",
        stderr
    );
    assert!(stdout.contains("Configuration check passed"), "{}", stdout);
    assert!(temp_dir.path().join("home").is_dir(), "home_dir is created");
}

#[test]
fn test_cli_check_rejects_unknown_module_keys() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        r#"
modules:
  articles:
    allow_anonymus_writes: false
"#,
    );

    let output = run_articles_server(&["--config", &config, "check"]);

    assert!(!output.status.success(), "Typos in module config must fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("articles"), "stderr: {}", stderr);
}

#[test]
fn test_cli_check_rejects_unsupported_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        r#"
database:
  url: "mysql://localhost/articles"
"#,
    );

    let output = run_articles_server(&["--config", &config, "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported database type"), "stderr: {}", stderr);
}

#[test]
fn test_cli_mock_flag_skips_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        r#"
database:
  url: "mysql://localhost/articles"
"#,
    );

    // --mock drops the database section, so the bad DSN is never looked at
    let output = run_articles_server(&["--config", &config, "--mock", "check"]);

    assert!(
        output.status.success(),
        "Should succeed with --mock: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_cli_print_config_applies_overrides() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "");

    let output = run_articles_server(&["--config", &config, "--port", "9321", "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("server:"), "{}", stdout);
    assert!(stdout.contains("port: 9321"), "{}", stdout);
}

#[test]
fn test_cli_print_config_with_verbose_raises_console_level() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "");

    let output = run_articles_server(&["--config", &config, "-vv", "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("console_level: trace"), "{}", stdout);
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_articles_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Start the server"), "{}", stdout);

    let output = run_articles_server(&["check", "--help"]);
    assert!(output.status.success(), "Check subcommand help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Check configuration"), "{}", stdout);
}

#[test]
fn test_cli_run_keeps_serving_until_killed() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "");

    let mut child = Command::new(env!("CARGO_BIN_EXE_articles-server"))
        .args(["--config", &config, "--mock", "run"])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start articles-server");

    std::thread::sleep(Duration::from_secs(2));
    let status = child.try_wait().expect("try_wait");
    if status.is_none() {
        child.kill().expect("kill");
        let _ = child.wait();
    } else {
        let output = child.wait_with_output().expect("output");
        panic!(
            "Server exited early: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[test]
fn test_cli_run_with_sqlite_creates_database_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        r#"
database:
  url: "sqlite://database/articles.db"
"#,
    );

    let mut child = Command::new(env!("CARGO_BIN_EXE_articles-server"))
        .args(["--config", &config, "run"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start articles-server");

    let db_file = temp_dir.path().join("home/database/articles.db");
    let mut found = false;
    for _ in 0..50 {
        if db_file.exists() {
            found = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    let _ = child.kill();
    let _ = child.wait();
    assert!(found, "sqlite file should be created under home_dir");
}
