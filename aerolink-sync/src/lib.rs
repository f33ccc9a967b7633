pub mod debounce;
pub mod poller;
pub mod refresh;

pub use debounce::Debouncer;
pub use poller::PeriodicPoller;
pub use refresh::{RefreshBus, RefreshHandle};
