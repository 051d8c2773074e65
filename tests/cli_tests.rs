//! End-to-end tests of the `lazyhost` binary.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;

use lazyhost::testkit::config::{FULL_TOML, MINIMAL_TOML};
use support::config::temp_config;

fn lazyhost() -> Command {
    let mut cmd = Command::cargo_bin("lazyhost").unwrap();
    cmd.env_remove("LAZYHOST_API_PASSWORD")
        .env_remove("LAZYHOST_WALLET_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn check_config_prints_every_enabled_module() {
    let file = temp_config(FULL_TOML);

    lazyhost()
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("Daemon: localhost:9980"))
        .stdout(predicate::str::contains("[unlock]"))
        .stdout(predicate::str::contains("[payout]"))
        .stdout(predicate::str::contains("wondershaper"));
}

#[test]
fn check_config_warns_about_an_idle_setup() {
    let file = temp_config(MINIMAL_TOML);

    lazyhost()
        .args(["check", "config", "-c"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No API password"))
        .stdout(predicate::str::contains("No modules enabled"));
}

#[test]
fn missing_config_file_exits_with_failure() {
    lazyhost()
        .args(["check", "config", "--config", "/nonexistent/lazyhost.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn invalid_config_lists_each_problem() {
    let file = temp_config(
        r#"
host = "localhost:9980"

[unlock]
enabled = true

[price]
enabled = true
minimum-price = 10
collateral-factor = 2
"#,
    );

    lazyhost()
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration errors:"))
        .stderr(predicate::str::contains("'wallet-password' in [unlock]"))
        .stderr(predicate::str::contains("'target' in [price]"));
}

#[test]
fn run_refuses_a_missing_config() {
    lazyhost()
        .args(["run", "--config", "/nonexistent/lazyhost.toml"])
        .assert()
        .code(1);
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    lazyhost()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
