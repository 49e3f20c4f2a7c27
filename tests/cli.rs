//! Integration tests for the deploy-profiles binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const FULL_ENV: &[(&str, &str)] = &[
    ("MAIN_WALLET_PRIVATE", "0xabc"),
    ("TEST_WALLET_PRIVATE", "0xtest"),
    ("MAIN_URL", "https://rpc.example"),
    ("RIN_URL", "https://rinkeby.example"),
    ("KOVAN_URL", "https://kovan.example"),
    ("MAIN_NETWORK_ID", "1"),
    ("RIN_NETWORK_ID", "4"),
    ("KOVAN_ID", "42"),
    ("GNOSIS_URL", "https://gnosis.example"),
    ("GNOSIS_ID", "100"),
    ("POLYGON_URL", "https://polygon.example"),
    ("POLYGON_ID", "137"),
    ("SCROLL_URL", "https://scroll.example"),
    ("SCROLL_ID", "534352"),
];

/// The binary with an empty environment.
fn bare_cmd() -> Command {
    let mut cmd = Command::cargo_bin("deploy-profiles").unwrap();
    cmd.env_clear();
    cmd
}

/// The binary with every default target's variables set.
fn configured_cmd() -> Command {
    let mut cmd = bare_cmd();
    cmd.envs(FULL_ENV.iter().copied());
    cmd
}

#[test]
fn test_check_fails_when_variables_missing() {
    bare_cmd()
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "missing required configuration: MAIN_URL",
        ))
        .stderr(predicate::str::contains("missing: TEST_WALLET_PRIVATE"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_failure_is_reported_once() {
    let output = bare_cmd().arg("check").output().unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();

    assert_eq!(
        stderr
            .matches("missing required configuration: MAIN_URL")
            .count(),
        1,
        "{stderr}"
    );
}

#[test]
fn test_check_succeeds_with_full_environment() {
    configured_cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 8 targets"))
        .stdout(predicate::str::contains("solc 0.8.14"));
}

#[test]
fn test_missing_shared_credential_names_the_key() {
    let mut cmd = configured_cmd();
    cmd.env_remove("TEST_WALLET_PRIVATE");

    cmd.arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "missing required configuration: TEST_WALLET_PRIVATE",
        ))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_show_never_prints_secret() {
    configured_cmd()
        .args(["show", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://rpc.example"))
        .stdout(predicate::str::contains("$MAIN_WALLET_PRIVATE"))
        .stdout(predicate::str::contains("0xabc").not())
        .stderr(predicate::str::contains("0xabc").not());
}

#[test]
fn test_show_unknown_target() {
    configured_cmd()
        .args(["show", "ropsten"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown deployment target: ropsten"));
}

#[test]
fn test_targets_file_without_targets_fails() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[compiler]\nversion = \"0.8.14\"").unwrap();

    bare_cmd()
        .arg("--targets")
        .arg(file.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no deployment targets defined"));
}

#[test]
fn test_targets_file_with_local_target() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[[targets]]\nname = \"anvil\"\nhost = \"127.0.0.1\"\nport = 8545"
    )
    .unwrap();

    bare_cmd()
        .arg("--targets")
        .arg(file.path())
        .args(["--compiler", "0.8.20", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 1 targets, compiler solc 0.8.20"));
}
