use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Trailing-edge debouncer: of a burst of calls, only the last one's action
/// runs, one `delay` after the burst settles.
///
/// Used to hold back the search text from the filter engine while the user
/// is still typing.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `action` after the configured delay, cancelling any action
    /// still pending from an earlier call. Must be called within a tokio
    /// runtime.
    pub fn call(&self, action: impl FnOnce() + Send + 'static) {
        let delay = self.delay;
        let task = tokio::spawn(async move {
            sleep(delay).await;
            action();
        });

        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    /// Drop any pending action without running it.
    pub fn cancel(&self) {
        if let Some(task) = self.pending.lock().unwrap().take() {
            task.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
