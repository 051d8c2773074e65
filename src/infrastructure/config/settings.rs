//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct. Configuration is loaded from a TOML
//! file, secrets may be overridden from the environment, and every enabled
//! module section is turned into a typed config before anything runs.
//!
//! # Example
//!
//! ```no_run
//! use lazyhost::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::{LoggingConfig, FORMATS};
use super::payout::{PayoutConfig, PayoutSection};
use super::price::{PriceConfig, PriceSection};
use super::restart::{RestartConfig, RestartSection};
use super::throttle::{ThrottleConfig, ThrottleSection};
use super::unlock::{UnlockConfig, UnlockSection, WALLET_PASSWORD_ENV};
use crate::error::{ConfigError, Result};

/// Environment variable overriding `api-password`.
pub const API_PASSWORD_ENV: &str = "LAZYHOST_API_PASSWORD";

const ROOT: &str = "root";

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// `address:port` of the daemon's HTTP API, e.g. `localhost:9980`.
    #[serde(default)]
    pub host: String,

    /// Daemon API password. Optional; the daemon may run without one.
    pub api_password: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub unlock: UnlockSection,
    #[serde(default)]
    pub price: PriceSection,
    #[serde(default)]
    pub restart: RestartSection,
    #[serde(default)]
    pub throttle: ThrottleSection,
    #[serde(default)]
    pub payout: PayoutSection,

    /// Typed configs of the enabled modules, filled by validation.
    #[serde(skip)]
    pub modules: ModuleConfigs,
}

/// Validated configuration of every enabled module.
#[derive(Debug, Clone, Default)]
pub struct ModuleConfigs {
    pub unlock: Option<UnlockConfig>,
    pub price: Option<PriceConfig>,
    pub restart: Option<RestartConfig>,
    pub throttle: Option<ThrottleConfig>,
    pub payout: Option<PayoutConfig>,
}

impl ModuleConfigs {
    /// Names of the enabled modules in startup order.
    pub fn names(&self) -> Vec<&'static str> {
        [
            ("unlock", self.unlock.is_some()),
            ("price", self.price.is_some()),
            ("restart", self.restart.is_some()),
            ("throttle", self.throttle.is_some()),
            ("payout", self.payout.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, enabled)| enabled.then_some(name))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and the collected
    /// validation problems otherwise.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(password) = std::env::var(API_PASSWORD_ENV) {
            self.api_password = Some(password);
        }
        if let Ok(password) = std::env::var(WALLET_PASSWORD_ENV) {
            self.unlock.wallet_password = Some(password);
        }
    }

    /// Validate every section and build the typed module configs.
    ///
    /// Disabled sections are not checked. All problems are reported at
    /// once; a single problem is returned as-is.
    #[allow(clippy::result_large_err)]
    fn validate(&mut self) -> Result<()> {
        let mut errors = Vec::new();

        let host = self.host.trim();
        if host.is_empty() {
            errors.push(ConfigError::missing(ROOT, "host"));
        } else if let Err(e) = url::Url::parse(&format!("http://{host}")) {
            errors.push(ConfigError::invalid(ROOT, "host", e.to_string()));
        }

        if !FORMATS.contains(&self.logging.format.as_str()) {
            errors.push(ConfigError::invalid(
                "logging",
                "format",
                format!("expected one of: {}", FORMATS.join(", ")),
            ));
        }

        let modules = ModuleConfigs {
            unlock: enabled(self.unlock.enabled, || self.unlock.validate(), &mut errors),
            price: enabled(self.price.enabled, || self.price.validate(), &mut errors),
            restart: enabled(self.restart.enabled, || self.restart.validate(), &mut errors),
            throttle: enabled(self.throttle.enabled, || self.throttle.validate(), &mut errors),
            payout: enabled(self.payout.enabled, || self.payout.validate(), &mut errors),
        };

        match errors.len() {
            0 => {
                self.host = host.to_string();
                self.modules = modules;
                Ok(())
            }
            1 => Err(errors.remove(0).into()),
            _ => Err(ConfigError::Invalid(errors).into()),
        }
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn enabled<T>(
    enabled: bool,
    validate: impl FnOnce() -> std::result::Result<T, Vec<ConfigError>>,
    errors: &mut Vec<ConfigError>,
) -> Option<T> {
    if !enabled {
        return None;
    }
    match validate() {
        Ok(config) => Some(config),
        Err(problems) => {
            errors.extend(problems);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::price::PriceTarget;

    #[test]
    fn minimal_config_enables_nothing() {
        let config = Config::parse_toml("host = \"localhost:9980\"").unwrap();
        assert_eq!(config.host, "localhost:9980");
        assert!(config.modules.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn disabled_sections_are_not_validated() {
        let toml = r#"
            host = "localhost:9980"

            [price]
            enabled = false
        "#;
        assert!(Config::parse_toml(toml).is_ok());
    }

    #[test]
    fn builds_enabled_modules() {
        let toml = r#"
            host = "localhost:9980"
            api-password = "secret"

            [price]
            enabled = true
            minimum-price = 50
            collateral-factor = 2
            siastats-rank = 10

            [restart]
            enabled = true
            stop-commands = ["systemctl stop siad"]
            start-commands = ["systemctl start siad"]
            sleep = 10
        "#;
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.modules.names(), vec!["price", "restart"]);
        let price = config.modules.price.unwrap();
        assert_eq!(price.target, PriceTarget::SiastatsRank(10));
    }

    #[test]
    fn missing_host_is_an_error() {
        let err = Config::parse_toml("").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField {
                section: "root",
                field: "host"
            })
        ));
    }

    #[test]
    fn collects_errors_across_sections() {
        let toml = r#"
            host = "localhost:9980"

            [price]
            enabled = true
            collateral-factor = 2
            hostdb-rank = 5

            [payout]
            enabled = true
            sleep-after = 60
        "#;
        let Error::Config(err) = Config::parse_toml(toml).unwrap_err() else {
            panic!("expected a config error");
        };
        // price: minimum-price; payout: minimum-available, block
        assert_eq!(err.problems().len(), 3);
        assert!(err.to_string().contains("minimum-price"));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let toml = r#"
            host = "localhost:9980"
            [logging]
            format = "xml"
        "#;
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse_toml("host = ").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
