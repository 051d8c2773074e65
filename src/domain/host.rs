//! Snapshots of remote node state.
//!
//! These are fetched fresh for every logical operation and never cached.

use std::fmt;

use super::money::{tiny_to_big, Hastings};

/// Host settings relevant to pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSettings {
    /// Minimum storage price in hastings per byte per block.
    pub storage_price: Hastings,
    /// Collateral in hastings per byte per block.
    pub collateral: Hastings,
    /// Address the host announces to the network.
    pub net_address: String,
}

impl HostSettings {
    /// Storage price in coins per terabyte per month.
    #[must_use]
    pub fn storage_price_big(&self) -> f64 {
        tiny_to_big(self.storage_price)
    }

    /// Collateral in coins per terabyte per month.
    #[must_use]
    pub fn collateral_big(&self) -> f64 {
        tiny_to_big(self.collateral)
    }
}

/// Writable host settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSetting {
    MinStoragePrice,
    Collateral,
}

impl HostSetting {
    /// Query key understood by the daemon.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::MinStoragePrice => "minstorageprice",
            Self::Collateral => "collateral",
        }
    }
}

impl fmt::Display for HostSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletStatus {
    pub unlocked: bool,
    pub confirmed_balance: Hastings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consensus {
    /// Hastings per coin as reported by the chain.
    pub coin_precision: Hastings,
}

/// Result of an unlock attempt. An already unlocked wallet counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Success,
    Failure,
}

/// Transactions created by a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_ids: Vec<String>,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.transaction_ids.is_empty() {
            return f.write_str("no transactions");
        }
        f.write_str(&self.transaction_ids.join(", "))
    }
}

/// One entry of an active host listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub net_address: String,
    pub storage_price: Hastings,
}

/// Position of this node in a host listing, with the price the listing
/// reports for it (coins per terabyte per month).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostRank {
    pub rank: u32,
    pub price: f64,
}

/// Find `own_address` in an ordered listing.
///
/// The listing is best-first, ranks are counted from the back: the last
/// entry is rank 1 and the first entry receives the highest rank.
#[must_use]
pub fn rank_in_listing(hosts: &[HostEntry], own_address: &str) -> Option<HostRank> {
    let count = hosts.len();
    hosts
        .iter()
        .position(|host| host.net_address == own_address)
        .map(|index| HostRank {
            rank: u32::try_from(count - index).unwrap_or(u32::MAX),
            price: tiny_to_big(hosts[index].storage_price),
        })
}
