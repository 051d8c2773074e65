//! Third-party host ranking port.

use async_trait::async_trait;

use crate::domain::HostRank;
use crate::error::Result;

#[async_trait]
pub trait RankingSource: Send + Sync {
    /// Rank and listed storage price (coins per terabyte per month) of the
    /// host announced at `net_address`, or `None` if the service does not
    /// list it.
    async fn rank_and_price(&self, net_address: &str) -> Result<Option<HostRank>>;

    /// Short name for log lines.
    fn source_name(&self) -> &'static str;
}
