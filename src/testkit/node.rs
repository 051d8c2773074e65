//! In-memory [`NodeApi`] with scripted state and recorded writes.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{
    big_to_tiny, Consensus, Hastings, HostEntry, HostSetting, HostSettings, Receipt,
    UnlockOutcome, WalletStatus,
};
use crate::error::{Error, Result};
use crate::port::NodeApi;

pub const OWN_ADDRESS: &str = "host.example.com:9982";

/// A write the node received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeCall {
    SetHostSetting(HostSetting, Hastings),
    UnlockWallet(String),
    SendPayment(Hastings, String),
}

/// Fake node whose reads return scripted state.
///
/// Writes update that state, so a later read observes them, and are
/// recorded in order. While unreachable every call fails with a transport
/// error.
pub struct ScriptedNode {
    settings: Mutex<HostSettings>,
    wallet: Mutex<WalletStatus>,
    unlock_outcome: Mutex<UnlockOutcome>,
    active_hosts: Mutex<Vec<HostEntry>>,
    unreachable: AtomicBool,
    calls: Mutex<Vec<NodeCall>>,
    reads: AtomicU32,
}

impl Default for ScriptedNode {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedNode {
    /// Unlocked, empty wallet; storage price 100 SC/TB/month, collateral 200.
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(HostSettings {
                storage_price: big_to_tiny(100.0),
                collateral: big_to_tiny(200.0),
                net_address: OWN_ADDRESS.to_string(),
            }),
            wallet: Mutex::new(WalletStatus {
                unlocked: true,
                confirmed_balance: Hastings::ZERO,
            }),
            unlock_outcome: Mutex::new(UnlockOutcome::Success),
            active_hosts: Mutex::new(Vec::new()),
            unreachable: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            reads: AtomicU32::new(0),
        }
    }

    /// Storage price in coins per terabyte per month.
    pub fn with_storage_price(self, price: f64) -> Self {
        self.settings.lock().storage_price = big_to_tiny(price);
        self
    }

    pub fn with_locked_wallet(self) -> Self {
        self.wallet.lock().unlocked = false;
        self
    }

    pub fn with_balance(self, siacoins: Decimal) -> Self {
        self.wallet.lock().confirmed_balance =
            Hastings::from_siacoins(siacoins).unwrap_or(Hastings::ZERO);
        self
    }

    pub fn with_unlock_outcome(self, outcome: UnlockOutcome) -> Self {
        *self.unlock_outcome.lock() = outcome;
        self
    }

    pub fn with_active_hosts(self, hosts: Vec<HostEntry>) -> Self {
        *self.active_hosts.lock() = hosts;
        self
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<NodeCall> {
        self.calls.lock().clone()
    }

    /// Number of read calls served, failed ones included.
    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn storage_price(&self) -> Hastings {
        self.settings.lock().storage_price
    }

    pub fn collateral(&self) -> Hastings {
        self.settings.lock().collateral
    }

    fn read(&self) -> Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.reachable()
    }

    fn reachable(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(Error::Transport("connection refused".into()));
        }
        Ok(())
    }
}

/// Entry for [`ScriptedNode::with_active_hosts`], price in coins per TB per month.
pub fn host_entry(net_address: &str, price: f64) -> HostEntry {
    HostEntry {
        net_address: net_address.to_string(),
        storage_price: big_to_tiny(price),
    }
}

#[async_trait]
impl NodeApi for ScriptedNode {
    async fn host_settings(&self) -> Result<HostSettings> {
        self.read()?;
        Ok(self.settings.lock().clone())
    }

    async fn set_host_setting(&self, setting: HostSetting, value: Hastings) -> Result<()> {
        self.reachable()?;
        {
            let mut settings = self.settings.lock();
            match setting {
                HostSetting::MinStoragePrice => settings.storage_price = value,
                HostSetting::Collateral => settings.collateral = value,
            }
        }
        self.calls.lock().push(NodeCall::SetHostSetting(setting, value));
        Ok(())
    }

    async fn wallet_status(&self) -> Result<WalletStatus> {
        self.read()?;
        Ok(*self.wallet.lock())
    }

    async fn consensus(&self) -> Result<Consensus> {
        self.read()?;
        Ok(Consensus {
            coin_precision: Hastings::new(crate::domain::money::HASTINGS_PER_SIACOIN),
        })
    }

    async fn unlock_wallet(&self, password: &str) -> Result<UnlockOutcome> {
        self.reachable()?;
        self.calls
            .lock()
            .push(NodeCall::UnlockWallet(password.to_string()));
        let outcome = *self.unlock_outcome.lock();
        if outcome == UnlockOutcome::Success {
            self.wallet.lock().unlocked = true;
        }
        Ok(outcome)
    }

    async fn send_payment(&self, amount: Hastings, destination: &str) -> Result<Receipt> {
        self.reachable()?;
        let index = {
            let mut calls = self.calls.lock();
            calls.push(NodeCall::SendPayment(amount, destination.to_string()));
            calls.len()
        };
        {
            let mut wallet = self.wallet.lock();
            wallet.confirmed_balance =
                Hastings::new(wallet.confirmed_balance.value().saturating_sub(amount.value()));
        }
        Ok(Receipt {
            transaction_ids: vec![format!("txn-{index}")],
        })
    }

    async fn active_hosts(&self) -> Result<Vec<HostEntry>> {
        self.read()?;
        Ok(self.active_hosts.lock().clone())
    }
}
