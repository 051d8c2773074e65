//! The contract every supervised module implements.

use std::convert::Infallible;

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;

/// An independently supervised, indefinitely running unit of periodic work.
///
/// `run` is one attempt. It owns all per-attempt state (counters, history)
/// in locals, so a restart by the [`Supervisor`](super::supervisor::Supervisor)
/// always starts from scratch. The return type admits no success value: the
/// only way out is an error, which the supervisor treats as a fault.
#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &'static str;

    /// Human-readable summary of the effective settings, one line each.
    fn describe_settings(&self) -> Vec<String>;

    async fn run(&self) -> Result<Infallible>;
}

/// Swallow recoverable errors for the current cycle.
///
/// Transport and protocol failures are logged and yield `Ok(None)`; the
/// caller skips the rest of the cycle. Anything else propagates to the
/// supervisor as a fault.
pub(crate) fn absorb<T>(module: &'static str, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => {
            warn!(module, error = %e, "Cycle skipped");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn recoverable_errors_are_absorbed() {
        let skipped = absorb::<()>("price", Err(Error::Transport("connection refused".into())));
        assert!(matches!(skipped, Ok(None)));

        let parsed = absorb::<()>("price", Err(Error::Protocol("bad json".into())));
        assert!(matches!(parsed, Ok(None)));

        assert!(matches!(absorb("price", Ok(3)), Ok(Some(3))));
    }

    #[test]
    fn faults_propagate() {
        let fault = absorb::<()>("restart", Err(Error::Command("sh missing".into())));
        assert!(matches!(fault, Err(Error::Command(_))));
    }
}
