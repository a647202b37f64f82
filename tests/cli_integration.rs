//! End-to-end CLI tests via the compiled binary.
//!
//! Only offline behavior is exercised here: help output, argument
//! validation, configuration, and completion generation. Nothing in this
//! file talks to a bridge.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with its config pinned inside a scratch home directory.
fn abap(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("abap").unwrap();
    cmd.env("HOME", home.path());
    cmd.env_remove("ABAPLINK_CONFIG");
    cmd.env_remove("XDG_CONFIG_HOME");
    cmd.env_remove("BRIDGE_URL");
    cmd
}

#[test]
fn help_lists_the_commands() {
    let home = TempDir::new().unwrap();
    abap(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("source"))
        .stdout(predicate::str::contains("class"))
        .stdout(predicate::str::contains("function"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn unknown_object_kind_is_rejected_offline() {
    let home = TempDir::new().unwrap();
    abap(&home)
        .args(["source", "view", "ZSOMETHING"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported object kind"))
        .stderr(predicate::str::contains("class"));
}

#[test]
fn config_list_shows_defaults() {
    let home = TempDir::new().unwrap();
    abap(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bridge_url = (default)"))
        .stdout(predicate::str::contains("already_exists_marker = (default)"));
}

#[test]
fn config_set_then_get_round_trips() {
    let home = TempDir::new().unwrap();
    abap(&home)
        .args(["config", "set", "default_package", "ZDEV"])
        .assert()
        .success();

    abap(&home)
        .args(["config", "get", "default_package"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ZDEV"));
}

#[test]
fn config_set_rejects_invalid_bridge_url() {
    let home = TempDir::new().unwrap();
    abap(&home)
        .args(["config", "set", "bridge_url", "not-a-url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http://"));
}

#[test]
fn config_rejects_unknown_keys() {
    let home = TempDir::new().unwrap();
    abap(&home)
        .args(["config", "get", "no_such_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_key"));
}

#[test]
fn completion_generates_a_script() {
    let home = TempDir::new().unwrap();
    abap(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abap"));
}

#[test]
fn mutually_exclusive_source_flags_are_rejected() {
    let home = TempDir::new().unwrap();
    abap(&home)
        .args([
            "class",
            "ZCL_X",
            "--file",
            "a.abap",
            "--source",
            "CLASS zcl_x.",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}
