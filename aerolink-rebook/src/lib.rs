pub mod disruption;

pub use disruption::{
    selectable_bookings, DisruptionManager, DisruptionSettings, RebookError, RebookPhase,
    DELAY_REPORTED_MESSAGE, REBOOKED_MESSAGE,
};
