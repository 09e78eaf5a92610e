//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A `fauna` command with its own home and working directory
fn fauna(home: &TempDir, cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fauna").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("RUST_LOG")
        .env_remove("FAUNA_ENDPOINT")
        .env_remove("FAUNA_SECRET")
        .env_remove("FAUNA_ENVIRONMENT")
        .env_remove("FAUNA_URL")
        .env_remove("FAUNA_GRAPHQL_HOST")
        .env_remove("FAUNA_GRAPHQL_PORT")
        .env_remove("FAUNA_OUTPUT_FORMAT")
        .current_dir(cwd.path());
    cmd
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("fauna").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fauna"));
}

#[test]
fn test_help_flag() {
    let mut cmd = Command::cargo_bin("fauna").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("endpoint"));
}

#[test]
fn test_resolve_without_config_fails() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    fauna(&home, &cwd)
        .arg("resolve")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No endpoint or secret set"));
}

#[test]
fn test_resolve_with_secret_flag() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    fauna(&home, &cwd)
        .args(["resolve", "--secret", "fn1234", "--url", "http://localhost:8443"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FAUNA_SECRET=fn1234:admin"))
        .stdout(predicate::str::contains("FAUNA_URL=http://localhost:8443"));
}

#[test]
fn test_secret_env_var() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    fauna(&home, &cwd)
        .env("FAUNA_SECRET", "fn777")
        .args(["resolve", "--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""secret": "fn777:admin""#));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    fauna(&home, &cwd)
        .args(["resolve", "--secret", "fn1", "--output-format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_endpoint_and_project_workflow() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    fauna(&home, &cwd)
        .args([
            "endpoint",
            "add",
            "local",
            "--url",
            "http://localhost:8443",
            "--secret",
            "fn1234",
            "--set-default",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved endpoint local"));

    let root = fs::read_to_string(home.path().join(".fauna-shell")).unwrap();
    assert!(root.contains("[endpoint.local]"));

    fauna(&home, &cwd)
        .args(["project", "init", "--name", "dev", "--endpoint", "local", "--database", "app"])
        .assert()
        .success();
    assert!(cwd.path().join(".fauna-project").is_file());

    fauna(&home, &cwd)
        .args(["resolve", "--scope", "child"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FAUNA_SECRET=fn1234:app/child:admin"));

    fauna(&home, &cwd)
        .args(["resolve", "--secret", "fn9", "--environment", "dev"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_environment_without_project() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    fauna(&home, &cwd)
        .args(["environment", "list"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("fauna project init"));
}

#[test]
fn test_invalid_root_config_exit_code() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(home.path().join(".fauna-shell"), "default = missing\n").unwrap();

    fauna(&home, &cwd)
        .args(["endpoint", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Default endpoint 'missing' was not found"));
}
