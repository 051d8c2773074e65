//! lazyhost - Automation daemon for storage hosts.
//!
//! Keeps a hosting node tidy without an operator: unlocks the wallet,
//! tracks a target rank by adjusting the storage price, pays out surplus
//! balance, restarts the daemon after long outages and throttles the
//! network interface to a share of the measured bandwidth.
//!
//! # Architecture
//!
//! Every concern is a [`Module`](application::Module): a named, endless
//! polling loop with its own cadence. The
//! [`Supervisor`](application::Supervisor) runs each module on its own task
//! and restarts it after a fixed cooldown whenever it fails, so one broken
//! module never takes down another.
//!
//! # Modules
//!
//! - [`domain`] - Currency units, node snapshots, pricing and payout math
//! - [`port`] - Traits for the daemon API, ranking service and host system
//! - [`adapter`] - HTTP clients and system integrations behind the ports
//! - [`application`] - Module contract, supervisor and the automation modules
//! - [`infrastructure`] - Configuration, wiring and the process runtime
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use lazyhost::infrastructure::config::settings::Config;
//! use lazyhost::infrastructure::runtime;
//!
//! # async fn example() -> lazyhost::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.init_logging();
//! runtime::run(&config).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
