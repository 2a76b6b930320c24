//! Single-slot delayed task scheduler.
//!
//! Scheduling a task cancels whichever task is still waiting out its quiet
//! period; only the trailing task fires. Once a task fires it is spawned on
//! its own and later calls no longer affect it.

use parking_lot::Mutex;
use std::{future::Future, time::Duration};
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: Mutex::new(None) }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer for `task`, replacing any task not yet fired.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });

        if let Some(previous) = self.pending.lock().replace(timer) {
            previous.abort();
            tracing::trace!("debounce: superseded pending task");
        }
    }

    /// Drop the pending task, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }

    /// True while a scheduled task is still waiting out its delay.
    pub fn is_pending(&self) -> bool {
        self.pending.lock().as_ref().is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
