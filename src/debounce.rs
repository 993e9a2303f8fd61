//! Debounced background actions
//!
//! A `Debouncer` delays an action and cancels it if another action is scheduled
//! before the delay runs out, so that only the last input of a burst (for
//! example, keystrokes in the search box) triggers any work.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Delay between the last search keystroke and the search being committed
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Cancellable, delayed task runner
///
/// Must be used from within a tokio runtime. Dropping the debouncer cancels
/// whatever is still pending.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedules `action` to run after the delay, aborting any earlier action
    /// that has not run yet
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    /// Aborts the pending action, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Returns true while a scheduled action has not finished
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
