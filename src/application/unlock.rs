//! Keeps the wallet unlocked.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::module::{absorb, Module};
use crate::domain::UnlockOutcome;
use crate::error::Result;
use crate::infrastructure::config::unlock::UnlockConfig;
use crate::port::NodeApi;

pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

pub struct UnlockModule {
    config: UnlockConfig,
    node: Arc<dyn NodeApi>,
}

impl UnlockModule {
    pub fn new(config: UnlockConfig, node: Arc<dyn NodeApi>) -> Self {
        Self { config, node }
    }

    /// Unlock the wallet if it is locked. Returns the attempt's outcome,
    /// `None` if the wallet was already unlocked.
    pub async fn cycle(&self) -> Result<Option<UnlockOutcome>> {
        if self.node.wallet_status().await?.unlocked {
            return Ok(None);
        }

        let outcome = self.node.unlock_wallet(&self.config.wallet_password).await?;
        match outcome {
            UnlockOutcome::Success => info!(module = self.name(), "Unlocked wallet"),
            UnlockOutcome::Failure => {
                warn!(module = self.name(), "Failed unlocking the wallet, retrying");
            }
        }
        Ok(Some(outcome))
    }
}

#[async_trait]
impl Module for UnlockModule {
    fn name(&self) -> &'static str {
        "unlock"
    }

    fn describe_settings(&self) -> Vec<String> {
        vec![
            "Module enabled".to_string(),
            format!("Checking the wallet every {}s", POLL_INTERVAL.as_secs()),
        ]
    }

    async fn run(&self) -> Result<Infallible> {
        loop {
            absorb(self.name(), self.cycle().await)?;
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
