//! Exchange-free domain types: currency units, node snapshots, pricing,
//! payouts and bandwidth arithmetic.
//!
//! Nothing in here performs I/O.

pub mod bandwidth;
pub mod host;
pub mod money;
pub mod payout;
pub mod pricing;

pub use bandwidth::{ThrottleRates, TrafficHistory};
pub use host::{
    rank_in_listing, Consensus, HostEntry, HostRank, HostSetting, HostSettings, Receipt,
    UnlockOutcome, WalletStatus,
};
pub use money::{big_to_tiny, tiny_to_big, Hastings};
pub use payout::TransactionJob;
pub use pricing::PriceAdjustment;
