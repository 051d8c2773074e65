//! Interface traffic sampling around a speed test.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::domain::TrafficHistory;
use crate::error::{Error, Result};
use crate::port::{InterfaceCounters, TrafficCounter};

/// Samples interface counters on a background task until finished.
///
/// The task never outlives the guard: [`finish`](Self::finish) stops and
/// joins it, and dropping the guard on any other path aborts it.
pub struct TrafficSampler {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<TrafficHistory>>>,
}

impl TrafficSampler {
    pub fn start(counter: Arc<dyn TrafficCounter>, period: Duration) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(sample(counter, period, stop_rx));
        Self {
            stop: Some(stop_tx),
            task: Some(task),
        }
    }

    /// Stop sampling and return the observed rates.
    ///
    /// # Errors
    /// Fails if the counters could not be read when sampling started.
    pub async fn finish(mut self) -> Result<TrafficHistory> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let Some(task) = self.task.take() else {
            return Ok(TrafficHistory::default());
        };
        task.await
            .map_err(|e| Error::Fault(format!("traffic sampler failed: {e}")))?
    }
}

impl Drop for TrafficSampler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn sample(
    counter: Arc<dyn TrafficCounter>,
    period: Duration,
    mut stop: oneshot::Receiver<()>,
) -> Result<TrafficHistory> {
    let mut history = TrafficHistory::default();
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    // Without a baseline the interface is unusable, not just noisy.
    let mut last = (counter.read()?, Instant::now());

    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                let now = Instant::now();
                match counter.read() {
                    Ok(counters) => {
                        let (down_bps, up_bps) = rates(last.0, counters, now - last.1);
                        history.push(down_bps, up_bps);
                        last = (counters, now);
                    }
                    Err(e) => warn!(error = %e, "Skipping traffic sample"),
                }
            }
        }
    }

    debug!(samples = history.len(), "Traffic sampling stopped");
    Ok(history)
}

/// Bits per second received and sent between two readings.
fn rates(before: InterfaceCounters, after: InterfaceCounters, elapsed: Duration) -> (f64, f64) {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return (0.0, 0.0);
    }
    // Counters reset when the interface goes down.
    let rx = after.rx_bytes.saturating_sub(before.rx_bytes) as f64;
    let tx = after.tx_bytes.saturating_sub(before.tx_bytes) as f64;
    (rx * 8.0 / secs, tx * 8.0 / secs)
}
