//! Composition root: turns validated configuration into modules.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::siad::SiadClient;
use crate::adapter::outbound::siastats::SiastatsClient;
use crate::adapter::outbound::system::{HttpSpeedTest, ShellRunner, SysfsTrafficCounter};
use crate::application::{
    Module, PayoutModule, PriceModule, RestartModule, ThrottleModule, UnlockModule,
};
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::{Config, ModuleConfigs};
use crate::port::{CommandRunner, NodeApi, RankingSource, SpeedTest, TrafficCounter};

/// Interface access for the throttle module.
pub struct ThrottleIo {
    pub counter: Arc<dyn TrafficCounter>,
    pub speedtest: Arc<dyn SpeedTest>,
}

/// Everything modules talk to. The node client is shared by all of them.
pub struct Collaborators {
    pub node: Arc<dyn NodeApi>,
    pub ranking: Arc<dyn RankingSource>,
    pub runner: Arc<dyn CommandRunner>,
    /// Present when the throttle module is enabled.
    pub throttle: Option<ThrottleIo>,
}

impl Collaborators {
    /// Production adapters for `config`.
    ///
    /// # Errors
    /// Fails if the daemon address does not form a valid URL.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_password = config.api_password.clone().unwrap_or_default();
        let node = SiadClient::new(&config.host, api_password)?;
        info!(url = node.base_url(), "Daemon client ready");

        let throttle = config.modules.throttle.as_ref().map(|throttle| ThrottleIo {
            counter: Arc::new(SysfsTrafficCounter::new(&throttle.interface)) as Arc<dyn TrafficCounter>,
            speedtest: Arc::new(HttpSpeedTest::new(
                throttle.speedtest.download_url.clone(),
                throttle.speedtest.upload_url.clone(),
                throttle.speedtest.upload_bytes,
            )) as Arc<dyn SpeedTest>,
        });

        Ok(Self {
            node: Arc::new(node),
            ranking: Arc::new(SiastatsClient::new()),
            runner: Arc::new(ShellRunner),
            throttle,
        })
    }
}

/// One module per enabled section, in startup order.
///
/// # Errors
/// Fails if the throttle module is enabled without [`ThrottleIo`].
pub fn build_modules(
    modules: &ModuleConfigs,
    collaborators: &Collaborators,
) -> Result<Vec<Arc<dyn Module>>> {
    let mut built: Vec<Arc<dyn Module>> = Vec::new();

    if let Some(config) = &modules.unlock {
        built.push(Arc::new(UnlockModule::new(
            config.clone(),
            Arc::clone(&collaborators.node),
        )));
    }
    if let Some(config) = &modules.price {
        built.push(Arc::new(PriceModule::new(
            config.clone(),
            Arc::clone(&collaborators.node),
            Arc::clone(&collaborators.ranking),
        )));
    }
    if let Some(config) = &modules.restart {
        built.push(Arc::new(RestartModule::new(
            config.clone(),
            Arc::clone(&collaborators.node),
            Arc::clone(&collaborators.runner),
        )));
    }
    if let Some(config) = &modules.throttle {
        let io = collaborators
            .throttle
            .as_ref()
            .ok_or_else(|| Error::Fault("throttle module needs interface access".into()))?;
        built.push(Arc::new(ThrottleModule::new(
            config.clone(),
            Arc::clone(&collaborators.runner),
            Arc::clone(&io.counter),
            Arc::clone(&io.speedtest),
        )));
    }
    if let Some(config) = &modules.payout {
        built.push(Arc::new(PayoutModule::new(
            config.clone(),
            Arc::clone(&collaborators.node),
        )));
    }

    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::config::full_config;
    use crate::testkit::node::ScriptedNode;
    use crate::testkit::system::{RecordingRunner, StaticRanking};

    fn fakes(throttle: Option<ThrottleIo>) -> Collaborators {
        Collaborators {
            node: Arc::new(ScriptedNode::new()),
            ranking: Arc::new(StaticRanking::new(None)),
            runner: Arc::new(RecordingRunner::new()),
            throttle,
        }
    }

    #[test]
    fn builds_enabled_modules_in_order() {
        let config = full_config();
        let collaborators = Collaborators::from_config(&config).unwrap();
        let modules = build_modules(&config.modules, &collaborators).unwrap();

        let names: Vec<_> = modules.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["unlock", "price", "restart", "throttle", "payout"]);
    }

    #[test]
    fn throttle_without_interface_access_fails() {
        let config = full_config();
        assert!(build_modules(&config.modules, &fakes(None)).is_err());
    }

    #[test]
    fn nothing_enabled_builds_nothing() {
        let modules = build_modules(&ModuleConfigs::default(), &fakes(None)).unwrap();
        assert!(modules.is_empty());
    }
}
