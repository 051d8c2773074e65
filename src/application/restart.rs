//! Restarts the daemon after a long run of failed health checks.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::module::Module;
use crate::error::Result;
use crate::infrastructure::config::restart::RestartConfig;
use crate::port::{CommandRunner, NodeApi};

pub const CHECK_INTERVAL: Duration = Duration::from_secs(300);

/// Consecutive failed checks that trigger a restart, about five hours.
pub const FAILURE_THRESHOLD: u32 = 60;

/// Consecutive health-check failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureCounter {
    failures: u32,
    threshold: u32,
}

impl FailureCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            failures: 0,
            threshold,
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Returns `true` if this success ended a run of failures.
    pub fn record_success(&mut self) -> bool {
        let recovered = self.failures > 0;
        self.failures = 0;
        recovered
    }

    /// Returns `true` once the threshold is reached.
    pub fn record_failure(&mut self) -> bool {
        self.failures = self.failures.saturating_add(1);
        self.failures >= self.threshold
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }
}

impl Default for FailureCounter {
    fn default() -> Self {
        Self::new(FAILURE_THRESHOLD)
    }
}

pub struct RestartModule {
    config: RestartConfig,
    node: Arc<dyn NodeApi>,
    runner: Arc<dyn CommandRunner>,
    check_interval: Duration,
}

impl RestartModule {
    pub fn new(config: RestartConfig, node: Arc<dyn NodeApi>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config,
            node,
            runner,
            check_interval: CHECK_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// One health check. Runs the restart routine and resets `counter`
    /// when the failure threshold is reached; returns whether it did.
    pub async fn check(&self, counter: &mut FailureCounter) -> Result<bool> {
        match self.node.host_settings().await {
            Ok(_) => {
                if counter.record_success() {
                    info!(module = self.name(), "Daemon reached again, failure counter reset");
                }
                Ok(false)
            }
            Err(e) => {
                let exhausted = counter.record_failure();
                warn!(
                    module = self.name(),
                    failures = counter.failures(),
                    threshold = FAILURE_THRESHOLD,
                    error = %e,
                    "Daemon failure {}/{}",
                    counter.failures(),
                    FAILURE_THRESHOLD
                );
                if !exhausted {
                    return Ok(false);
                }
                self.restart_routine().await?;
                counter.reset();
                Ok(true)
            }
        }
    }

    async fn restart_routine(&self) -> Result<()> {
        info!(module = self.name(), "Start offline restart routine");
        for command in &self.config.stop_commands {
            self.run_command(command).await?;
        }

        info!(
            module = self.name(),
            "Sleep after stop commands for {}s",
            self.config.sleep.as_secs_f64()
        );
        tokio::time::sleep(self.config.sleep).await;

        for command in &self.config.start_commands {
            self.run_command(command).await?;
        }

        info!(
            module = self.name(),
            "Cooldown after starting for {}s",
            self.config.cooldown.as_secs_f64()
        );
        tokio::time::sleep(self.config.cooldown).await;
        Ok(())
    }

    async fn run_command(&self, command: &str) -> Result<()> {
        info!(module = self.name(), command, "Running command: $ {command}");
        let code = self.runner.run(command).await?;
        info!(module = self.name(), command, exit_code = code, "Exit code: {code}");
        Ok(())
    }
}

#[async_trait]
impl Module for RestartModule {
    fn name(&self) -> &'static str {
        "restart"
    }

    fn describe_settings(&self) -> Vec<String> {
        let mut lines = vec!["Module enabled".to_string()];
        if self.config.stop_commands.is_empty() {
            lines.push("Warning! Stop commands disabled".to_string());
        }
        lines.extend(self.config.stop_commands.iter().map(|c| format!("Stop: $ {c}")));
        lines.push(format!(
            "Sleep after stopping for {}s",
            self.config.sleep.as_secs_f64()
        ));
        if self.config.start_commands.is_empty() {
            lines.push("Warning! Start commands disabled".to_string());
        }
        lines.extend(self.config.start_commands.iter().map(|c| format!("Start: $ {c}")));
        lines.push(format!(
            "Cooldown after starting for {}s",
            self.config.cooldown.as_secs_f64()
        ));
        lines
    }

    async fn run(&self) -> Result<Infallible> {
        let mut counter = FailureCounter::default();
        loop {
            // After a restart the next check follows immediately.
            if !self.check(&mut counter).await? {
                tokio::time::sleep(self.check_interval).await;
            }
        }
    }
}
