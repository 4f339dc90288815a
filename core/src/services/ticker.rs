//! Background task that calls a closure on a fixed period.
//!
//! Used for the handoff countdown and for publishing live trip time.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, warn};

/// Smallest period accepted; `tokio::time::interval` panics on zero
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a running periodic task
///
/// The task is aborted when the handle is cancelled or dropped.
#[derive(Debug)]
pub struct PeriodicTask {
    name: String,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawns `f` on the current tokio runtime
    ///
    /// The first call happens one `period` after spawning. The task ends when
    /// `f` returns `ControlFlow::Break(())`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<F, Fut>(name: impl Into<String>, period: Duration, mut f: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let name = name.into();
        let period = period.max(MIN_PERIOD);
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            let mut ticks: u64 = 0;

            loop {
                interval.tick().await;
                ticks += 1;

                if f().await.is_break() {
                    debug!(task = %task_name, ticks, "Periodic task finished");
                    break;
                }
            }
        });

        Self { name, handle }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stops the task; it will not run again
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// The task ended on its own or was cancelled
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the task and waits until it is gone
    pub async fn shutdown(mut self) {
        self.handle.abort();
        match (&mut self.handle).await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => warn!(task = %self.name, error = %e, "Periodic task panicked"),
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
