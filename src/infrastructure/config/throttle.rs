//! Bandwidth throttle module configuration.

use std::time::Duration;

use serde::Deserialize;

use super::validation::Problems;
use crate::adapter::outbound::system::speedtest::{
    DEFAULT_DOWNLOAD_URL, DEFAULT_UPLOAD_BYTES, DEFAULT_UPLOAD_URL,
};
use crate::domain::bandwidth::{
    placeholders, THROTTLE_PLACEHOLDERS, UNTHROTTLE_PLACEHOLDERS,
};
use crate::error::ConfigError;

const SECTION: &str = "throttle";

const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 750;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ThrottleSection {
    #[serde(default)]
    pub enabled: bool,
    pub interface: Option<String>,
    pub throttle_command: Option<String>,
    pub unthrottle_command: Option<String>,
    /// Seconds between speed tests.
    pub interval: Option<f64>,
    /// Factor applied to the measured upload peak.
    pub up: Option<f64>,
    /// Factor applied to the measured download peak.
    pub down: Option<f64>,
    pub sample_interval_ms: Option<u64>,
    pub speedtest_download_url: Option<String>,
    pub speedtest_upload_url: Option<String>,
    pub speedtest_upload_bytes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleConfig {
    pub interface: String,
    pub throttle_command: String,
    pub unthrottle_command: String,
    pub interval: Duration,
    pub up_factor: f64,
    pub down_factor: f64,
    pub sample_interval: Duration,
    pub speedtest: SpeedTestConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedTestConfig {
    pub download_url: String,
    pub upload_url: String,
    pub upload_bytes: usize,
}

impl Default for SpeedTestConfig {
    fn default() -> Self {
        Self {
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            upload_bytes: DEFAULT_UPLOAD_BYTES,
        }
    }
}

impl ThrottleSection {
    pub fn validate(&self) -> Result<ThrottleConfig, Vec<ConfigError>> {
        let mut problems = Problems::new(SECTION);
        let interface = problems.text("interface", &self.interface);
        let throttle_command = problems.text("throttle-command", &self.throttle_command);
        let unthrottle_command = problems.text("unthrottle-command", &self.unthrottle_command);
        let interval = problems.interval_secs("interval", self.interval);
        let up_factor = problems.positive("up", self.up);
        let down_factor = problems.positive("down", self.down);

        for (field, template, allowed) in [
            ("throttle-command", &throttle_command, THROTTLE_PLACEHOLDERS),
            ("unthrottle-command", &unthrottle_command, UNTHROTTLE_PLACEHOLDERS),
        ] {
            if let Some(template) = template {
                check_placeholders(&mut problems, field, template, allowed);
            }
        }

        let sample_ms = self.sample_interval_ms.unwrap_or(DEFAULT_SAMPLE_INTERVAL_MS);
        if sample_ms == 0 {
            problems.invalid("sample-interval-ms", "must be greater than 0");
        }

        let defaults = SpeedTestConfig::default();
        let speedtest = SpeedTestConfig {
            download_url: self
                .speedtest_download_url
                .clone()
                .unwrap_or(defaults.download_url),
            upload_url: self
                .speedtest_upload_url
                .clone()
                .unwrap_or(defaults.upload_url),
            upload_bytes: self.speedtest_upload_bytes.unwrap_or(defaults.upload_bytes),
        };
        for (field, url) in [
            ("speedtest-download-url", &speedtest.download_url),
            ("speedtest-upload-url", &speedtest.upload_url),
        ] {
            if let Err(e) = url::Url::parse(url) {
                problems.invalid(field, e.to_string());
            }
        }

        match (
            interface,
            throttle_command,
            unthrottle_command,
            interval,
            up_factor,
            down_factor,
        ) {
            (
                Some(interface),
                Some(throttle_command),
                Some(unthrottle_command),
                Some(interval),
                Some(up_factor),
                Some(down_factor),
            ) if problems.is_empty() => Ok(ThrottleConfig {
                interface,
                throttle_command,
                unthrottle_command,
                interval,
                up_factor,
                down_factor,
                sample_interval: Duration::from_millis(sample_ms),
                speedtest,
            }),
            _ => Err(problems.into_errors()),
        }
    }
}

fn check_placeholders(
    problems: &mut Problems,
    field: &'static str,
    template: &str,
    allowed: &[&str],
) {
    let unknown: Vec<&str> = placeholders(template)
        .into_iter()
        .filter(|name| !allowed.contains(name))
        .collect();
    if !unknown.is_empty() {
        problems.invalid(
            field,
            format!(
                "unknown placeholder(s) {{{}}}, expected one of: {}",
                unknown.join("}, {"),
                allowed.join(", ")
            ),
        );
    }
}
