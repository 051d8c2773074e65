mod support;

use std::time::Duration;

use lazyhost::error::{ConfigError, Error};
use lazyhost::infrastructure::config::price::PriceTarget;
use lazyhost::infrastructure::config::settings::Config;
use lazyhost::testkit::config::{FULL_TOML, MINIMAL_TOML};
use rust_decimal_macros::dec;
use support::config::temp_config;

#[test]
fn full_config_loads_from_file() {
    let file = temp_config(FULL_TOML);
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.host, "localhost:9980");
    assert_eq!(config.api_password.as_deref(), Some("api-secret"));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.modules.names(),
        vec!["unlock", "price", "restart", "throttle", "payout"]
    );

    let price = config.modules.price.as_ref().unwrap();
    assert_eq!(price.target, PriceTarget::SiastatsRank(10));

    let restart = config.modules.restart.as_ref().unwrap();
    assert_eq!(restart.cooldown, Duration::from_secs(600));

    let throttle = config.modules.throttle.as_ref().unwrap();
    assert_eq!(throttle.sample_interval, Duration::from_millis(750));

    let payout = config.modules.payout.as_ref().unwrap();
    assert_eq!(payout.block.len(), 2);
    assert_eq!(payout.block[1].amount, dec!(50.5));
}

#[test]
fn missing_file_is_a_read_error() {
    let result = Config::load("/nonexistent/lazyhost/config.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn minimal_config_starts_no_modules() {
    let config = Config::parse_toml(MINIMAL_TOML).unwrap();
    assert!(config.modules.is_empty());
    assert!(config.api_password.is_none());
}

#[test]
fn enabled_module_with_missing_key_is_rejected() {
    let toml = r#"
host = "localhost:9980"

[unlock]
enabled = true
"#;

    match Config::parse_toml(toml) {
        Err(Error::Config(ConfigError::MissingField {
            section: "unlock",
            field: "wallet-password",
        })) => {}
        Err(err) => panic!("expected missing wallet-password, got {err}"),
        Ok(_) => panic!("expected the unlock section to be rejected"),
    }
}

#[test]
fn every_problem_is_reported_at_once() {
    let toml = r#"
host = "localhost:9980"

[price]
enabled = true
minimum-price = -1
collateral-factor = 2
usd = 3
hostdb-rank = 4

[throttle]
enabled = true
interface = "eth0"
throttle-command = "tc {speed}"
unthrottle-command = "tc clear"
interval = 0
up = 0.5
down = 0.5
"#;

    let Err(Error::Config(err)) = Config::parse_toml(toml) else {
        panic!("expected a config error");
    };
    let fields: Vec<String> = err
        .problems()
        .iter()
        .map(|problem| match problem {
            ConfigError::MissingField { section, field }
            | ConfigError::InvalidValue { section, field, .. } => format!("{section}.{field}"),
            other => other.to_string(),
        })
        .collect();

    assert_eq!(
        fields,
        vec![
            "price.minimum-price",
            "price.target",
            "throttle.interval",
            "throttle.throttle-command",
        ]
    );
}

#[test]
fn invalid_host_is_rejected() {
    let toml = r#"host = "local host:99 80""#;
    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::InvalidValue { field: "host", .. }))
    ));
}

#[test]
fn oversized_duration_is_a_config_error() {
    let toml = r#"
host = "localhost:9980"

[payout]
enabled = true
minimum-available = 10
sleep-after = 1e30

[[payout.block]]
name = "rent"
address = "addr-rent"
amount = 1
"#;

    match Config::parse_toml(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            section: "payout",
            field: "sleep-after",
            reason,
        })) => assert_eq!(reason, "out of range"),
        Err(err) => panic!("expected sleep-after out of range, got {err}"),
        Ok(_) => panic!("expected the payout section to be rejected"),
    }
}
