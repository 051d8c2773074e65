//! Host system integration: shell, interface counters, speed tests.

pub mod shell;
pub mod speedtest;
pub mod sysfs;

pub use shell::ShellRunner;
pub use speedtest::HttpSpeedTest;
pub use sysfs::SysfsTrafficCounter;
