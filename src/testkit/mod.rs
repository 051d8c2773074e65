//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`node`] - [`ScriptedNode`](node::ScriptedNode), an in-memory
//!   [`NodeApi`](crate::port::NodeApi) with recorded writes.
//! - [`system`] - Fakes for commands, interface counters, speed tests and
//!   the ranking service.
//! - [`http`] - A stub HTTP server for adapter tests.
//! - [`config`] - Canonical test configuration files.

pub mod config;
pub mod http;
pub mod node;
pub mod system;
