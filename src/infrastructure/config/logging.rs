//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

pub const FORMATS: &[&str] = &["pretty", "json"];

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Apply command-line overrides on top of the file settings.
    pub fn with_overrides(mut self, level: Option<&str>, json: bool) -> Self {
        if let Some(level) = level {
            self.level = level.to_string();
        }
        if json {
            self.format = "json".into();
        }
        self
    }

    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// `RUST_LOG` wins over the configured level. Calling this twice is
    /// harmless; the second subscriber is ignored.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let _ = match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).try_init(),
            _ => fmt().with_env_filter(filter).try_init(),
        };
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_file_settings() {
        let config = LoggingConfig::default().with_overrides(Some("debug"), true);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, "json");

        let untouched = LoggingConfig::default().with_overrides(None, false);
        assert_eq!(untouched.format, "pretty");
    }
}
