//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the remote daemon, the ranking service and the
//! host system the modules act on.

pub mod node;
pub mod ranking;
pub mod system;
