//! Restart-on-failure module configuration.

use std::time::Duration;

use serde::Deserialize;

use super::validation::Problems;
use crate::error::ConfigError;

const SECTION: &str = "restart";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RestartSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub stop_commands: Vec<String>,
    /// Seconds between the stop and the start commands.
    pub sleep: Option<f64>,
    #[serde(default)]
    pub start_commands: Vec<String>,
    /// Seconds to wait after the start commands before health checks resume.
    pub cooldown: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartConfig {
    pub stop_commands: Vec<String>,
    pub sleep: Duration,
    pub start_commands: Vec<String>,
    pub cooldown: Duration,
}

impl RestartSection {
    pub fn validate(&self) -> Result<RestartConfig, Vec<ConfigError>> {
        let mut problems = Problems::new(SECTION);
        let sleep = problems.delay_secs("sleep", self.sleep);
        let cooldown = problems.delay_secs("cooldown", self.cooldown);

        for (field, commands) in [
            ("stop-commands", &self.stop_commands),
            ("start-commands", &self.start_commands),
        ] {
            if commands.iter().any(|command| command.trim().is_empty()) {
                problems.invalid(field, "commands must not be blank");
            }
        }

        match (sleep, cooldown) {
            (Some(sleep), Some(cooldown)) if problems.is_empty() => Ok(RestartConfig {
                stop_commands: self.stop_commands.clone(),
                sleep,
                start_commands: self.start_commands.clone(),
                cooldown,
            }),
            _ => Err(problems.into_errors()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_is_optional() {
        let config = RestartSection {
            enabled: true,
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert!(config.stop_commands.is_empty());
        assert_eq!(config.sleep, Duration::ZERO);
        assert_eq!(config.cooldown, Duration::ZERO);
    }

    #[test]
    fn rejects_blank_commands_and_negative_delays() {
        let errors = RestartSection {
            enabled: true,
            stop_commands: vec!["systemctl stop siad".into(), " ".into()],
            sleep: Some(-3.0),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
