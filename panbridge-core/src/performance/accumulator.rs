//! Background polling of `sysstat storage` and `sysstat director`

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;

use super::window::{MAX_HISTORY, RollingWindow};
use crate::models::{MetadataDataPoint, PerformanceDataPoint, PerformanceSummary};
use crate::parser::{CommandParser, SysstatDirectorParser, SysstatStorageParser};
use crate::session::CommandExecutor;
use crate::tracing::span_names::PERFORMANCE_POLL;

/// Default poll interval (5 minutes)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct History {
    storage: RollingWindow<PerformanceDataPoint>,
    metadata: RollingWindow<MetadataDataPoint>,
}

impl History {
    fn new() -> Self {
        Self {
            storage: RollingWindow::new(MAX_HISTORY),
            metadata: RollingWindow::new(MAX_HISTORY),
        }
    }
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Both samples were recorded
    Recorded,
    /// A command failed; nothing was recorded
    Skipped,
}

/// Keeps rolling storage and metadata histories by polling on an interval
///
/// The first poll runs as soon as the accumulator starts. A failed poll is
/// logged and skipped; the history is left as it was.
pub struct PerformanceAccumulator {
    executor: Arc<dyn CommandExecutor>,
    history: Arc<RwLock<History>>,
    ticks: watch::Receiver<u64>,
    stop_tx: mpsc::Sender<()>,
    task: Mutex<Option<JoinHandle<()>>>,
    interval: Duration,
}

impl PerformanceAccumulator {
    /// Spawns the polling task
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn start(executor: Arc<dyn CommandExecutor>, interval: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let history = Arc::new(RwLock::new(History::new()));
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let (ticks_tx, ticks_rx) = watch::channel(0_u64);

        let task_executor = Arc::clone(&executor);
        let task_history = Arc::clone(&history);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop_rx.recv() => {
                        tracing::debug!("Performance accumulator stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        poll(task_executor.as_ref(), &task_history)
                            .instrument(tracing::debug_span!(PERFORMANCE_POLL))
                            .await;
                        ticks_tx.send_modify(|n| *n += 1);
                    }
                }
            }
        });

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            capacity = MAX_HISTORY,
            "Performance accumulator started"
        );

        Self {
            executor,
            history,
            ticks: ticks_rx,
            stop_tx,
            task: Mutex::new(Some(task)),
            interval,
        }
    }

    /// Runs one poll outside the schedule
    pub async fn poll_now(&self) -> PollOutcome {
        poll(self.executor.as_ref(), &self.history).await
    }

    /// Waits until at least `count` scheduled ticks have finished
    ///
    /// Returns early if the polling task has stopped.
    pub async fn wait_for_ticks(&self, count: u64) {
        let mut ticks = self.ticks.clone();
        let _ = ticks.wait_for(|n| *n >= count).await;
    }

    /// Scheduled ticks finished so far, failed ones included
    #[must_use]
    pub fn ticks(&self) -> u64 {
        *self.ticks.borrow()
    }

    /// Current figures and full histories
    pub async fn summary(&self) -> PerformanceSummary {
        let history = self.history.read().await;
        PerformanceSummary::from_history(history.storage.to_vec(), history.metadata.to_vec())
    }

    /// Latest storage sample, if any
    pub async fn latest(&self) -> Option<PerformanceDataPoint> {
        self.history.read().await.storage.latest().cloned()
    }

    /// Number of storage samples held
    pub async fn len(&self) -> usize {
        self.history.read().await.storage.len()
    }

    /// Returns `true` before the first successful poll
    pub async fn is_empty(&self) -> bool {
        self.history.read().await.storage.is_empty()
    }

    /// Configured interval
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Stops polling and waits for the task to finish
    ///
    /// Calling it again is a no-op.
    pub async fn stop(&self) {
        let _ = self.stop_tx.try_send(());
        if let Some(task) = self.task.lock().await.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PerformanceAccumulator {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.task.try_lock()
            && let Some(task) = guard.take()
        {
            task.abort();
        }
    }
}

/// Issues both commands concurrently and records both samples, or neither
async fn poll(executor: &dyn CommandExecutor, history: &RwLock<History>) -> PollOutcome {
    let timestamp = Utc::now();
    let (storage, director) = tokio::join!(
        executor.execute(SysstatStorageParser::COMMAND),
        executor.execute(SysstatDirectorParser::COMMAND),
    );

    let (storage, director) = match (storage, director) {
        (Ok(storage), Ok(director)) => (storage, director),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Performance poll failed, skipping tick");
            return PollOutcome::Skipped;
        }
    };

    let sample = SysstatStorageParser::parse_at(&storage.output, timestamp);
    let metadata = SysstatDirectorParser::parse_at(&director.output, timestamp);

    let mut history = history.write().await;
    history.storage.push(sample);
    history.metadata.push(metadata);
    tracing::debug!(samples = history.storage.len(), "Performance sample recorded");
    PollOutcome::Recorded
}
