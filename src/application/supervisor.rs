//! Fault-isolating supervisor for [`Module`]s.
//!
//! Every module gets its own supervision task. An attempt runs in a
//! separately spawned task so that both errors and panics end only that
//! attempt. After a fault the supervisor waits a fixed cooldown and starts
//! a fresh attempt, forever, until shutdown is requested.
//!
//! ```text
//!             +-----------------------------------------+
//!             v                                         |
//! Starting -> Running -> Failed -> CoolingDown ---------+
//!    \           \                    /
//!     +-----------+------------------+--> ShuttingDown
//! ```
//!
//! Supervision tasks share nothing but the status table, which is only
//! written by the task that owns the entry.

use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

use super::module::Module;
use crate::error::{Error, Result};

/// Delay between a module fault and its restart.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Starting,
    Running,
    Failed,
    CoolingDown,
    ShuttingDown,
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Failed => "failed",
            Self::CoolingDown => "cooling down",
            Self::ShuttingDown => "shutting down",
        };
        f.write_str(text)
    }
}

/// The most recent fault of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultRecord {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Point-in-time view of one supervised module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStatus {
    pub name: &'static str,
    pub state: ModuleState,
    /// Attempts started after a fault.
    pub restarts: u32,
    pub last_fault: Option<FaultRecord>,
}

type StatusTable = Arc<RwLock<Vec<ModuleStatus>>>;

/// Owns the modules until [`Supervisor::start`] hands them to their tasks.
pub struct Supervisor {
    modules: Vec<Arc<dyn Module>>,
    cooldown: Duration,
}

impl Supervisor {
    pub fn new(modules: Vec<Arc<dyn Module>>) -> Self {
        Self {
            modules,
            cooldown: DEFAULT_COOLDOWN,
        }
    }

    /// Override the restart cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Spawn one supervision task per module.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(self) -> SupervisorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let statuses: StatusTable = Arc::new(RwLock::new(
            self.modules
                .iter()
                .map(|module| ModuleStatus {
                    name: module.name(),
                    state: ModuleState::Starting,
                    restarts: 0,
                    last_fault: None,
                })
                .collect(),
        ));

        let tasks = self
            .modules
            .into_iter()
            .enumerate()
            .map(|(index, module)| {
                let slot = StatusSlot {
                    table: Arc::clone(&statuses),
                    index,
                };
                tokio::spawn(supervise(module, slot, self.cooldown, shutdown_rx.clone()))
            })
            .collect();

        SupervisorHandle {
            shutdown_tx,
            tasks,
            statuses,
        }
    }
}

/// Handle for observing and stopping a running [`Supervisor`].
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) also
/// stops the modules, but does not wait for them.
pub struct SupervisorHandle {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
    statuses: StatusTable,
}

impl SupervisorHandle {
    pub fn statuses(&self) -> Vec<ModuleStatus> {
        self.statuses.read().clone()
    }

    pub fn status(&self, name: &str) -> Option<ModuleStatus> {
        self.statuses
            .read()
            .iter()
            .find(|status| status.name == name)
            .cloned()
    }

    /// Stop restarting, abort in-flight attempts and cooldowns, and wait
    /// for every supervision task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Supervision task ended abnormally");
            }
        }
    }
}

struct StatusSlot {
    table: StatusTable,
    index: usize,
}

impl StatusSlot {
    fn update(&self, f: impl FnOnce(&mut ModuleStatus)) {
        if let Some(status) = self.table.write().get_mut(self.index) {
            f(status);
        }
    }

    fn set(&self, state: ModuleState) {
        self.update(|status| status.state = state);
    }
}

async fn supervise(
    module: Arc<dyn Module>,
    slot: StatusSlot,
    cooldown: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let name = module.name();
    let mut first = true;

    loop {
        if *shutdown.borrow() {
            break;
        }

        slot.update(|status| {
            status.state = ModuleState::Starting;
            if !first {
                status.restarts += 1;
            }
        });
        first = false;

        info!(module = name, "Start module");
        let attempt = tokio::spawn({
            let module = Arc::clone(&module);
            async move { module.run().await }
        });
        let abort = attempt.abort_handle();
        slot.set(ModuleState::Running);

        let joined = tokio::select! {
            joined = attempt => joined,
            _ = shutdown_requested(&mut shutdown) => {
                abort.abort();
                break;
            }
        };

        let fault = describe_fault(joined);
        slot.update(|status| {
            status.state = ModuleState::Failed;
            status.last_fault = Some(FaultRecord {
                message: fault.clone(),
                at: Utc::now(),
            });
        });
        report_fault(name, &fault, cooldown);

        slot.set(ModuleState::CoolingDown);
        tokio::select! {
            _ = tokio::time::sleep(cooldown) => {}
            _ = shutdown_requested(&mut shutdown) => break,
        }
    }

    slot.set(ModuleState::ShuttingDown);
    info!(module = name, "Module stopped");
}

/// Resolves once shutdown is requested or the handle is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

fn describe_fault(joined: std::result::Result<Result<Infallible>, JoinError>) -> String {
    match joined {
        Ok(Err(e)) => error_chain(&e),
        Ok(Ok(never)) => match never {},
        Err(e) if e.is_panic() => format!("panicked: {}", panic_message(e.into_panic())),
        Err(e) => format!("attempt aborted: {e}"),
    }
}

fn error_chain(err: &Error) -> String {
    let mut text = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        text.push_str("\n  caused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn report_fault(name: &'static str, fault: &str, cooldown: Duration) {
    error!(
        module = name,
        "\n# ========\n# Uncaught error in module: {name}\n# ========\n{fault}"
    );
    info!(
        module = name,
        cooldown_secs = cooldown.as_secs_f64(),
        "Restarting module in {}",
        humanize(cooldown)
    );
}

fn humanize(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0 => format!("{} ms", duration.as_millis()),
        s if s % 60 == 0 && s >= 60 => {
            let minutes = s / 60;
            if minutes == 1 {
                "one minute".to_string()
            } else {
                format!("{minutes} minutes")
            }
        }
        s => format!("{s} seconds"),
    }
}
