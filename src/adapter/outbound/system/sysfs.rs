//! Interface byte counters from `/sys/class/net`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::port::{InterfaceCounters, TrafficCounter};

pub const SYSFS_NET_ROOT: &str = "/sys/class/net";

#[derive(Debug, Clone)]
pub struct SysfsTrafficCounter {
    statistics: PathBuf,
}

impl SysfsTrafficCounter {
    #[must_use]
    pub fn new(interface: &str) -> Self {
        Self::with_root(SYSFS_NET_ROOT, interface)
    }

    /// Read counters below another root, laid out like `/sys/class/net`.
    #[must_use]
    pub fn with_root(root: impl AsRef<Path>, interface: &str) -> Self {
        Self {
            statistics: root.as_ref().join(interface).join("statistics"),
        }
    }

    fn read_counter(&self, name: &str) -> Result<u64> {
        let path = self.statistics.join(name);
        let text = fs::read_to_string(&path)?;
        text.trim().parse().map_err(|e| {
            Error::Fault(format!("unreadable counter {}: {e}", path.display()))
        })
    }
}

impl TrafficCounter for SysfsTrafficCounter {
    fn read(&self) -> Result<InterfaceCounters> {
        Ok(InterfaceCounters {
            rx_bytes: self.read_counter("rx_bytes")?,
            tx_bytes: self.read_counter("tx_bytes")?,
        })
    }
}
