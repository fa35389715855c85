#![allow(clippy::unwrap_used)]
//! CLI smoke tests to verify basic command functionality.
//!
//! These tests ensure that the CLI binary starts correctly and
//! responds to basic commands without crashing.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(deprecated)]
fn chatloop(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chatloop").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("NO_COLOR", "1");
    cmd
}

fn write_config(config_home: &TempDir, contents: &str) {
    let dir = config_home.path().join("chatloop");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}

#[test]
fn test_help_displays_usage() {
    let home = TempDir::new().unwrap();
    chatloop(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Interactive chat with a language model"))
        .stdout(predicate::str::contains("--endpoint"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--fail-fast"))
        .stdout(predicate::str::contains("--greedy"));
}

#[test]
fn test_version_displays_version() {
    let home = TempDir::new().unwrap();
    chatloop(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_greedy_conflicts_with_temperature() {
    let home = TempDir::new().unwrap();
    chatloop(&home)
        .args(["--greedy", "--temperature", "0.7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_providers_list_without_config() {
    let home = TempDir::new().unwrap();
    chatloop(&home)
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("No providers configured"));
}

#[test]
fn test_providers_list_with_config() {
    let home = TempDir::new().unwrap();
    write_config(
        &home,
        r#"
[chatloop]
provider = "local"

[providers.local]
endpoint = "http://localhost:8000"
models = ["NousResearch/Llama-2-7b-chat-hf"]
"#,
    );

    chatloop(&home)
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("local (default)"))
        .stdout(predicate::str::contains("http://localhost:8000"));
}

#[test]
fn test_providers_show_unknown() {
    let home = TempDir::new().unwrap();
    write_config(
        &home,
        r#"
[providers.local]
endpoint = "http://localhost:8000"
"#,
    );

    chatloop(&home)
        .args(["providers", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
