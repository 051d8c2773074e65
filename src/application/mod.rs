//! Application layer: the module contract, the supervisor and the
//! automation modules built on top of the ports.

pub mod module;
pub mod payout;
pub mod price;
pub mod restart;
pub mod supervisor;
pub mod throttle;
pub mod unlock;

pub use module::Module;
pub use payout::PayoutModule;
pub use price::PriceModule;
pub use restart::RestartModule;
pub use supervisor::{ModuleState, ModuleStatus, Supervisor, SupervisorHandle};
pub use throttle::ThrottleModule;
pub use unlock::UnlockModule;
