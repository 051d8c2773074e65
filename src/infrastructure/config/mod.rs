//! Infrastructure configuration modules.

pub mod logging;
pub mod payout;
pub mod price;
pub mod restart;
pub mod settings;
pub mod throttle;
pub mod unlock;
mod validation;
