//! Tracks a target rank by nudging the storage price.
//!
//! Every cycle the module looks up the node's current rank, checks that
//! the listing has caught up with the live price and then moves the price
//! one [`RANK_STEP_FACTOR`](crate::domain::pricing::RANK_STEP_FACTOR) step
//! per rank of distance. Collateral follows the price.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::module::{absorb, Module};
use crate::domain::pricing::{adjust_for_rank_delta, is_stale, percentage_delta};
use crate::domain::{big_to_tiny, HostRank, HostSetting, PriceAdjustment};
use crate::error::Result;
use crate::infrastructure::config::price::{PriceConfig, PriceTarget};
use crate::port::{NodeApi, RankingSource};

pub const CYCLE_INTERVAL: Duration = Duration::from_secs(300);

/// What one pricing cycle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceCycle {
    Adjusted(PriceAdjustment),
    /// The node is not in the listing.
    NotListed,
    /// The listed price lags behind the live price.
    Stale { listed: f64, live: f64 },
    /// The target has no pricing rule.
    Unsupported,
}

pub struct PriceModule {
    config: PriceConfig,
    node: Arc<dyn NodeApi>,
    ranking: Arc<dyn RankingSource>,
    interval: Duration,
}

impl PriceModule {
    pub fn new(config: PriceConfig, node: Arc<dyn NodeApi>, ranking: Arc<dyn RankingSource>) -> Self {
        Self {
            config,
            node,
            ranking,
            interval: CYCLE_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub async fn cycle(&self) -> Result<PriceCycle> {
        let (target, source) = match self.config.target {
            PriceTarget::Usd(usd) => {
                warn!(
                    module = self.name(),
                    usd, "Pricing by fiat value is not supported, nothing to do"
                );
                return Ok(PriceCycle::Unsupported);
            }
            PriceTarget::HostdbRank(rank) => (rank, "hostdb"),
            PriceTarget::SiastatsRank(rank) => (rank, self.ranking.source_name()),
        };

        let Some(current) = self.current_rank().await? else {
            warn!(
                module = self.name(),
                source, "Could not find own host in the listing, listing not up to date?"
            );
            return Ok(PriceCycle::NotListed);
        };
        info!(module = self.name(), source, rank = current.rank, "Current rank #{}", current.rank);

        let live = self.node.host_settings().await?.storage_price_big();
        if is_stale(current.price, live) {
            info!(
                module = self.name(),
                source,
                listed = current.price,
                live,
                delta_percent = percentage_delta(current.price, live),
                "Listing not up to date, retry later"
            );
            return Ok(PriceCycle::Stale {
                listed: current.price,
                live,
            });
        }

        let rank_delta = i64::from(target) - i64::from(current.rank);
        let adjustment = adjust_for_rank_delta(
            live,
            rank_delta,
            self.config.minimum_price,
            self.config.collateral_factor,
        );
        info!(
            module = self.name(),
            rank_delta,
            price = adjustment.price,
            collateral = adjustment.collateral,
            "New price {:.4} SC/TB/month",
            adjustment.price
        );

        self.node
            .set_host_setting(HostSetting::MinStoragePrice, big_to_tiny(adjustment.price))
            .await?;
        self.node
            .set_host_setting(HostSetting::Collateral, big_to_tiny(adjustment.collateral))
            .await?;

        Ok(PriceCycle::Adjusted(adjustment))
    }

    async fn current_rank(&self) -> Result<Option<HostRank>> {
        match self.config.target {
            PriceTarget::HostdbRank(_) => self.node.rank_and_price_for_self().await,
            _ => {
                let own_address = self.node.host_settings().await?.net_address;
                self.ranking.rank_and_price(&own_address).await
            }
        }
    }
}

#[async_trait]
impl Module for PriceModule {
    fn name(&self) -> &'static str {
        "price"
    }

    fn describe_settings(&self) -> Vec<String> {
        let target = match self.config.target {
            PriceTarget::Usd(usd) => format!("Keep price at ${usd}"),
            PriceTarget::HostdbRank(rank) => format!("Set price to target hostdb rank #{rank}"),
            PriceTarget::SiastatsRank(rank) => {
                format!("Set price to target siastats rank #{rank}")
            }
        };
        vec![
            "Module enabled".to_string(),
            format!("Collateral factor: {}", self.config.collateral_factor),
            format!("Minimum price: {}SC", self.config.minimum_price),
            target,
        ]
    }

    async fn run(&self) -> Result<Infallible> {
        loop {
            absorb(self.name(), self.cycle().await)?;
            tokio::time::sleep(self.interval).await;
        }
    }
}
