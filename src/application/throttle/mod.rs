//! Measures the link and throttles the interface to a share of it.
//!
//! A cycle lifts the current throttle, saturates the link with a speed test
//! while [`TrafficSampler`] watches the interface counters, and throttles
//! again to the configured fraction of the observed peaks.

mod sampler;

pub use sampler::TrafficSampler;

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::module::{absorb, Module};
use crate::domain::bandwidth::render_template;
use crate::domain::ThrottleRates;
use crate::error::Result;
use crate::infrastructure::config::throttle::ThrottleConfig;
use crate::port::{CommandRunner, SpeedTest, TrafficCounter};

pub struct ThrottleModule {
    config: ThrottleConfig,
    runner: Arc<dyn CommandRunner>,
    counter: Arc<dyn TrafficCounter>,
    speedtest: Arc<dyn SpeedTest>,
}

impl ThrottleModule {
    pub fn new(
        config: ThrottleConfig,
        runner: Arc<dyn CommandRunner>,
        counter: Arc<dyn TrafficCounter>,
        speedtest: Arc<dyn SpeedTest>,
    ) -> Self {
        Self {
            config,
            runner,
            counter,
            speedtest,
        }
    }

    /// Run one measure-and-throttle cycle. Returns the applied rates, or
    /// `None` when no traffic could be sampled and the link stays
    /// unthrottled.
    pub async fn cycle(&self) -> Result<Option<ThrottleRates>> {
        let interface = [("interface", self.config.interface.clone())];
        let unthrottle = render_template(&self.config.unthrottle_command, &interface);
        self.run_command(&unthrottle).await?;

        info!(module = self.name(), "Measuring bandwidth");
        let sampler =
            TrafficSampler::start(Arc::clone(&self.counter), self.config.sample_interval);
        self.speedtest.download().await?;
        self.speedtest.upload().await?;
        let history = sampler.finish().await?;

        if history.is_empty() {
            warn!(module = self.name(), "No traffic samples, leaving the link unthrottled");
            return Ok(None);
        }

        let (peak_up, peak_down) = (history.peak_up_bps(), history.peak_down_bps());
        info!(
            module = self.name(),
            samples = history.len(),
            peak_up_bps = peak_up,
            peak_down_bps = peak_down,
            "Peak rates up {:.2} Mbit/s, down {:.2} Mbit/s",
            peak_up / 1e6,
            peak_down / 1e6
        );

        let rates = ThrottleRates::from_peaks(
            peak_up,
            peak_down,
            self.config.up_factor,
            self.config.down_factor,
        );
        let values = rates.template_values(&self.config.interface);
        let throttle = render_template(&self.config.throttle_command, &values);
        self.run_command(&throttle).await?;

        Ok(Some(rates))
    }

    async fn run_command(&self, command: &str) -> Result<()> {
        info!(module = self.name(), command, "Running command: $ {command}");
        let code = self.runner.run(command).await?;
        if code != 0 {
            warn!(module = self.name(), command, exit_code = code, "Command exited with {code}");
        }
        Ok(())
    }
}

#[async_trait]
impl Module for ThrottleModule {
    fn name(&self) -> &'static str {
        "throttle"
    }

    fn describe_settings(&self) -> Vec<String> {
        vec![
            "Module enabled".to_string(),
            format!("Interface: {}", self.config.interface),
            format!("Throttle: $ {}", self.config.throttle_command),
            format!("Unthrottle: $ {}", self.config.unthrottle_command),
            format!(
                "Limit to {}% up and {}% down of the measured peak",
                self.config.up_factor * 100.0,
                self.config.down_factor * 100.0
            ),
            format!("Measure every {}s", self.config.interval.as_secs_f64()),
        ]
    }

    async fn run(&self) -> Result<Infallible> {
        loop {
            absorb(self.name(), self.cycle().await)?;
            tokio::time::sleep(self.config.interval).await;
        }
    }
}
