//! Outbound adapters (driven side).

pub mod siad;
pub mod siastats;
pub mod system;
