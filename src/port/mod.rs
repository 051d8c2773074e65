//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │   Modules + Supervisor  │
//!                    └────────────┬────────────┘
//!          ┌──────────────────────┼──────────────────────┐
//!          ▼                      ▼                      ▼
//!    ┌───────────┐         ┌─────────────┐         ┌───────────┐
//!    │   siad    │         │  siastats   │         │  system   │
//!    │  Adapter  │         │   Adapter   │         │  Adapter  │
//!    └───────────┘         └─────────────┘         └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`NodeApi`] - Remote daemon control API
//! - [`RankingSource`] - Third-party host ranking
//! - [`CommandRunner`], [`TrafficCounter`], [`SpeedTest`] - Host system

pub mod outbound;

pub use outbound::node::NodeApi;
pub use outbound::ranking::RankingSource;
pub use outbound::system::{CommandRunner, InterfaceCounters, SpeedTest, TrafficCounter};
