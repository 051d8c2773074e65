//! Wallet unlock module configuration.

use std::fmt;

use serde::Deserialize;

use super::validation::Problems;
use crate::error::ConfigError;

const SECTION: &str = "unlock";

/// Environment variable overriding `wallet-password`.
pub const WALLET_PASSWORD_ENV: &str = "LAZYHOST_WALLET_PASSWORD";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnlockSection {
    #[serde(default)]
    pub enabled: bool,
    pub wallet_password: Option<String>,
}

impl UnlockSection {
    pub fn validate(&self) -> Result<UnlockConfig, Vec<ConfigError>> {
        let mut problems = Problems::new(SECTION);
        // An empty password is valid for unencrypted seeds.
        let password = problems.require("wallet-password", &self.wallet_password);

        match password {
            Some(wallet_password) if problems.is_empty() => Ok(UnlockConfig { wallet_password }),
            _ => Err(problems.into_errors()),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct UnlockConfig {
    pub wallet_password: String,
}

impl fmt::Debug for UnlockConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockConfig")
            .field("wallet_password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_password() {
        let section = UnlockSection {
            enabled: true,
            wallet_password: None,
        };
        let errors = section.validate().unwrap_err();
        assert!(matches!(
            errors[0],
            ConfigError::MissingField {
                section: "unlock",
                field: "wallet-password"
            }
        ));
    }

    #[test]
    fn debug_output_hides_password() {
        let config = UnlockSection {
            enabled: true,
            wallet_password: Some("hunter2".into()),
        }
        .validate()
        .unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
