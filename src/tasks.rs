//! Background task slots.
//!
//! [`LatestTask`] keeps at most one spawned task alive: installing a new one
//! aborts its predecessor. [`Debouncer`] builds on it to delay work until the
//! caller has been quiet for a fixed window.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Quiet window before a search keystroke hits the backend.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Slot for the single live instance of some background job.
#[derive(Debug, Default)]
pub struct LatestTask {
    handle: Option<JoinHandle<()>>,
}

impl LatestTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handle`, aborting whatever task was there before.
    pub fn replace(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.handle.replace(handle) {
            previous.abort();
        }
    }

    /// Spawns `future` as the new live task.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.replace(tokio::spawn(future));
    }

    /// Aborts the live task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether a task is installed and has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for LatestTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Runs only the last of a burst of calls, `delay` after it was made.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    task: LatestTask,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            task: LatestTask::new(),
        }
    }

    /// Schedules `future` after the quiet window, dropping any pending call.
    pub fn call<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        self.task.spawn(async move {
            tokio::time::sleep(delay).await;
            future.await;
        });
    }

    /// Runs `future` right away, dropping any pending call.
    pub fn call_now<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.task.spawn(future);
    }

    pub fn cancel(&mut self) {
        self.task.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_pending()
    }
}
