//! Tick scheduling port.
//!
//! The engine asks for a periodic tick when a session starts running and
//! cancels it on every transition back to idle. Each registration gets a
//! fresh [`TickHandle`], so a tick delivered after its handle was cancelled
//! can be recognised and dropped.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

/// Identifies one tick registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

pub trait TickScheduler {
    /// Begin delivering ticks every `period`.
    fn schedule(&mut self, period: Duration) -> TickHandle;

    /// Stop delivering ticks for `handle`. Unknown handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

/// Scheduler that delivers nothing on its own; the caller drives ticks.
///
/// Records every registration and cancellation.
#[derive(Debug, Default)]
pub struct ManualTicker {
    next_id: u64,
    active: Option<TickHandle>,
    period: Option<Duration>,
    scheduled: usize,
    cancelled: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live registration, if any.
    pub fn active(&self) -> Option<TickHandle> {
        self.active
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl TickScheduler for ManualTicker {
    fn schedule(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.active = Some(handle);
        self.period = Some(period);
        self.scheduled += 1;
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.active == Some(handle) {
            self.active = None;
            self.cancelled += 1;
        }
    }
}

/// Tokio-backed scheduler.
///
/// Each registration runs an interval task that sends its handle down the
/// channel returned by [`TokioTicker::channel`]. Cancelling aborts the task.
/// `schedule` must be called from within a Tokio runtime.
pub struct TokioTicker {
    next_id: u64,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
    tx: mpsc::UnboundedSender<TickHandle>,
}

impl TokioTicker {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TickHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Self {
            next_id: 0,
            tasks: HashMap::new(),
            tx,
        };
        (ticker, rx)
    }

    /// Number of registrations still running.
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl TickScheduler for TokioTicker {
    fn schedule(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
