use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

type RefreshFn = Arc<dyn Fn() + Send + Sync>;

/// Invokes a refresh function on a fixed cadence while enabled.
///
/// The first invocation happens one full interval after enabling, never
/// immediately. There is no jitter, no backoff, and no overlap guard: the
/// callback is invoked synchronously on schedule, and any async work it
/// spawns may still be in flight when the next tick fires — refresh logic
/// must be safe under overlap.
pub struct PeriodicPoller {
    interval: Duration,
    on_refresh: RefreshFn,
    task: Option<JoinHandle<()>>,
}

impl PeriodicPoller {
    /// Create a disabled poller. Call [`set_enabled`](Self::set_enabled) to
    /// arm it. Must be used within a tokio runtime.
    pub fn new(interval: Duration, on_refresh: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            interval,
            on_refresh: Arc::new(on_refresh),
            task: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.task.is_some()
    }

    /// Arm or disarm the repeating timer. Disabling clears the timer; no
    /// dangling timers survive disablement.
    pub fn set_enabled(&mut self, enabled: bool) {
        match (enabled, self.task.is_some()) {
            (true, false) => self.arm(),
            (false, true) => self.disarm(),
            _ => {}
        }
    }

    /// Change the cadence. While enabled this clears the old timer first and
    /// re-arms with the new interval, rather than mixing old and new.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
        if self.task.is_some() {
            self.disarm();
            self.arm();
        }
    }

    /// Swap the refresh function, re-arming under the same rule as
    /// [`set_interval`](Self::set_interval).
    pub fn set_on_refresh(&mut self, on_refresh: impl Fn() + Send + Sync + 'static) {
        self.on_refresh = Arc::new(on_refresh);
        if self.task.is_some() {
            self.disarm();
            self.arm();
        }
    }

    fn arm(&mut self) {
        let interval = self.interval;
        let on_refresh = self.on_refresh.clone();
        self.task = Some(tokio::spawn(async move {
            loop {
                sleep(interval).await;
                on_refresh();
            }
        }));
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PeriodicPoller {
    fn drop(&mut self) {
        self.disarm();
    }
}
