//! Response bodies of the daemon's control API.
//!
//! Currency fields arrive as decimal strings of hastings.
//!
//! Example `GET /host` body (trimmed):
//! ```json
//! {"externalsettings":{"netaddress":"host.example:9982"},
//!  "internalsettings":{"minstorageprice":"23148148148","collateral":"46296296296"}}
//! ```

use serde::Deserialize;

use crate::domain::{Consensus, Hastings, HostEntry, HostSettings, Receipt, WalletStatus};

#[derive(Debug, Deserialize)]
pub struct HostGet {
    pub externalsettings: ExternalSettings,
    pub internalsettings: InternalSettings,
}

#[derive(Debug, Deserialize)]
pub struct ExternalSettings {
    pub netaddress: String,
}

#[derive(Debug, Deserialize)]
pub struct InternalSettings {
    pub minstorageprice: Hastings,
    pub collateral: Hastings,
}

impl From<HostGet> for HostSettings {
    fn from(body: HostGet) -> Self {
        Self {
            storage_price: body.internalsettings.minstorageprice,
            collateral: body.internalsettings.collateral,
            net_address: body.externalsettings.netaddress,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WalletGet {
    pub unlocked: bool,
    pub confirmedsiacoinbalance: Hastings,
}

impl From<WalletGet> for WalletStatus {
    fn from(body: WalletGet) -> Self {
        Self {
            unlocked: body.unlocked,
            confirmed_balance: body.confirmedsiacoinbalance,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConsensusGet {
    pub siacoinprecision: Hastings,
}

impl From<ConsensusGet> for Consensus {
    fn from(body: ConsensusGet) -> Self {
        Self {
            coin_precision: body.siacoinprecision,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WalletSiacoinsPost {
    #[serde(default)]
    pub transactionids: Vec<String>,
}

impl From<WalletSiacoinsPost> for Receipt {
    fn from(body: WalletSiacoinsPost) -> Self {
        Self {
            transaction_ids: body.transactionids,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HostdbActiveGet {
    #[serde(default)]
    pub hosts: Vec<HostdbEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HostdbEntry {
    pub netaddress: String,
    pub storageprice: Hastings,
}

impl From<HostdbEntry> for HostEntry {
    fn from(entry: HostdbEntry) -> Self {
        Self {
            net_address: entry.netaddress,
            storage_price: entry.storageprice,
        }
    }
}
