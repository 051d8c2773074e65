//! Host system ports: shell commands, interface counters, speed tests.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` through the shell and return its exit code.
    ///
    /// A command that could not be spawned is an error; a command that ran
    /// and failed is not.
    async fn run(&self, command: &str) -> Result<i32>;
}

/// Cumulative byte counters of one network interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

pub trait TrafficCounter: Send + Sync {
    fn read(&self) -> Result<InterfaceCounters>;
}

/// Generates as much traffic as the link allows, first down then up.
///
/// The measured rate is taken from [`TrafficCounter`] samples, so the
/// speed test itself only has to saturate the link.
#[async_trait]
pub trait SpeedTest: Send + Sync {
    async fn download(&self) -> Result<()>;
    async fn upload(&self) -> Result<()>;
}
