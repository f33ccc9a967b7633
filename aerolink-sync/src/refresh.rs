use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Decouples "something changed" from "who needs to know".
///
/// Views register zero-argument refresh callbacks; mutating operations fire
/// them all. Delivery is best-effort: a callback that panics is logged and
/// the rest still run, and there are no retries.
#[derive(Clone, Default)]
pub struct RefreshBus {
    callbacks: Arc<Mutex<HashMap<u64, Callback>>>,
    next_id: Arc<AtomicU64>,
}

/// Handle returned by [`RefreshBus::register`]; consumes itself to remove
/// the callback. Dropping the handle without calling `unregister` leaves the
/// callback registered.
pub struct RefreshHandle {
    id: u64,
    callbacks: Weak<Mutex<HashMap<u64, Callback>>>,
}

impl RefreshHandle {
    pub fn unregister(self) {
        if let Some(callbacks) = self.callbacks.upgrade() {
            callbacks.lock().unwrap().remove(&self.id);
        }
    }
}

impl RefreshBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback; each registration is independent, even for the same
    /// closure registered twice.
    pub fn register(&self, callback: impl Fn() + Send + Sync + 'static) -> RefreshHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks.lock().unwrap().insert(id, Arc::new(callback));
        RefreshHandle {
            id,
            callbacks: Arc::downgrade(&self.callbacks),
        }
    }

    /// Invoke every registered callback synchronously, in unspecified order.
    ///
    /// Iterates over a snapshot of the registry, so callbacks may register
    /// or unregister mid-broadcast without being skipped or double-called.
    pub fn trigger_now(&self) {
        let snapshot: Vec<Callback> = {
            let callbacks = self.callbacks.lock().unwrap();
            callbacks.values().cloned().collect()
        };

        for callback in snapshot {
            if catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
                tracing::error!("Refresh callback panicked; continuing with remaining callbacks");
            }
        }
    }

    /// Schedule a single `trigger_now` after `delay`. Pending delayed
    /// triggers are not cancelled; overlapping schedules all fire.
    ///
    /// Must be called within a tokio runtime.
    pub fn trigger_after(&self, delay: Duration) {
        let bus = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            bus.trigger_now();
        });
    }

    pub fn len(&self) -> usize {
        self.callbacks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.lock().unwrap().is_empty()
    }
}
