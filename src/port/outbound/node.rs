//! Remote node port.
//!
//! The control API of the hosting daemon. Every call is independent: no
//! session, no cache, values may lag behind the node's own state.

use async_trait::async_trait;

use crate::domain::{
    rank_in_listing, Consensus, Hastings, HostEntry, HostRank, HostSetting, HostSettings, Receipt,
    UnlockOutcome, WalletStatus,
};
use crate::error::Result;

#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Current host settings.
    ///
    /// # Errors
    /// `Transport` on network failure, `Protocol` on an unexpected response.
    async fn host_settings(&self) -> Result<HostSettings>;

    /// Write one host setting, value in hastings per byte per block.
    async fn set_host_setting(&self, setting: HostSetting, value: Hastings) -> Result<()>;

    async fn wallet_status(&self) -> Result<WalletStatus>;

    async fn consensus(&self) -> Result<Consensus>;

    /// Unlock the wallet. Idempotent: an already unlocked wallet is a success.
    async fn unlock_wallet(&self, password: &str) -> Result<UnlockOutcome>;

    async fn send_payment(&self, amount: Hastings, destination: &str) -> Result<Receipt>;

    /// The daemon's own view of active hosts, best first.
    async fn active_hosts(&self) -> Result<Vec<HostEntry>>;

    /// Rank and listed price of this node in the daemon's active host list.
    ///
    /// Returns `None` if the node's announced address is not listed.
    async fn rank_and_price_for_self(&self) -> Result<Option<HostRank>> {
        let own_address = self.host_settings().await?.net_address;
        let hosts = self.active_hosts().await?;
        Ok(rank_in_listing(&hosts, &own_address))
    }
}
