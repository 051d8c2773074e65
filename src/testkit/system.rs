//! Fakes for the host system and ranking ports.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::HostRank;
use crate::error::{Error, Result};
use crate::port::{CommandRunner, InterfaceCounters, RankingSource, SpeedTest, TrafficCounter};

/// Records every command and answers with exit code 0.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &str) -> Result<i32> {
        self.commands.lock().push(command.to_string());
        Ok(0)
    }
}

/// Interface counters that grow by a fixed amount per read.
///
/// Rates are given in bytes per read; scripted steps are consumed first,
/// after which the last step repeats.
#[derive(Debug)]
pub struct ScriptedCounter {
    current: Mutex<InterfaceCounters>,
    steps: Mutex<VecDeque<(u64, u64)>>,
    last_step: Mutex<(u64, u64)>,
    reads: AtomicU32,
}

impl ScriptedCounter {
    /// Constant growth of `rx` and `tx` bytes per read.
    pub fn constant(rx: u64, tx: u64) -> Self {
        Self::with_steps(vec![(rx, tx)])
    }

    pub fn with_steps(steps: Vec<(u64, u64)>) -> Self {
        let last = steps.last().copied().unwrap_or((0, 0));
        Self {
            current: Mutex::new(InterfaceCounters::default()),
            steps: Mutex::new(steps.into()),
            last_step: Mutex::new(last),
            reads: AtomicU32::new(0),
        }
    }

    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }
}

impl TrafficCounter for ScriptedCounter {
    fn read(&self) -> Result<InterfaceCounters> {
        let previous_reads = self.reads.fetch_add(1, Ordering::SeqCst);
        let mut current = self.current.lock();
        // The first read establishes the baseline.
        if previous_reads > 0 {
            let (rx, tx) = self
                .steps
                .lock()
                .pop_front()
                .unwrap_or(*self.last_step.lock());
            current.rx_bytes += rx;
            current.tx_bytes += tx;
        }
        Ok(*current)
    }
}

/// Speed test that only waits. Either phase can be made to fail.
#[derive(Debug, Clone)]
pub struct FakeSpeedTest {
    duration: Duration,
    fail_upload: bool,
    runs: Arc<AtomicU32>,
}

impl FakeSpeedTest {
    /// Each phase takes `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            fail_upload: false,
            runs: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    /// Completed download phases.
    pub fn runs(&self) -> u32 {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeedTest for FakeSpeedTest {
    async fn download(&self) -> Result<()> {
        tokio::time::sleep(self.duration).await;
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upload(&self) -> Result<()> {
        tokio::time::sleep(self.duration).await;
        if self.fail_upload {
            return Err(Error::Transport("upload reset by peer".into()));
        }
        Ok(())
    }
}

/// Ranking source with a fixed answer.
#[derive(Debug, Default)]
pub struct StaticRanking {
    rank: Mutex<Option<HostRank>>,
    queries: Mutex<Vec<String>>,
}

impl StaticRanking {
    pub fn new(rank: Option<HostRank>) -> Self {
        Self {
            rank: Mutex::new(rank),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn set(&self, rank: Option<HostRank>) {
        *self.rank.lock() = rank;
    }

    /// Addresses looked up so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl RankingSource for StaticRanking {
    async fn rank_and_price(&self, net_address: &str) -> Result<Option<HostRank>> {
        self.queries.lock().push(net_address.to_string());
        Ok(*self.rank.lock())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}
