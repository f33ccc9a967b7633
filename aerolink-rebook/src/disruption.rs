use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

use aerolink_core::error::ApiError;
use aerolink_core::{BookingApi, RecommendationApi};
use aerolink_shared::{Booking, DelayNotification, DelayReport, RebookingSuggestion};
use aerolink_sync::RefreshBus;

/// Message shown after a delay report lands and suggestions are available.
pub const DELAY_REPORTED_MESSAGE: &str =
    "Delay notification created successfully! Alternative flights are now available.";

/// Message shown after a successful rebooking.
pub const REBOOKED_MESSAGE: &str = "Successfully rebooked to alternative flight!";

/// Per-booking workflow phase.
///
/// `Idle -> Simulating -> DelayActive -> Rebooking -> Idle`, with
/// `Simulating -> Error -> Idle` on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebookPhase {
    Idle,
    Simulating,
    DelayActive,
    Rebooking,
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum RebookError {
    #[error("Only confirmed bookings can report a delay")]
    NotConfirmed,

    #[error("Booking has no flight to report a delay for")]
    MissingFlight,

    #[error("No reported delay for this booking")]
    NoActiveDelay,

    #[error("Another operation is already in flight for this booking")]
    OperationInProgress,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl RebookError {
    /// The inline string for this failure.
    pub fn user_message(&self) -> String {
        match self {
            RebookError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    pub fn simulate_failure_message(&self) -> String {
        format!("Failed to simulate delay: {}", self.user_message())
    }

    pub fn rebook_failure_message(&self) -> String {
        format!("Rebooking failed: {}", self.user_message())
    }
}

/// Knobs for the synthetic delay and the post-rebook refresh debounce.
#[derive(Debug, Clone)]
pub struct DisruptionSettings {
    pub reason: String,
    /// Offset added to "now" as the synthetic new departure time.
    pub delay_offset: chrono::Duration,
    /// Wait before broadcasting a refresh after a successful rebooking; the
    /// backend's update is assumed not to be immediately readable.
    pub refresh_delay: Duration,
}

impl Default for DisruptionSettings {
    fn default() -> Self {
        Self {
            reason: "Technical issues with aircraft".to_string(),
            delay_offset: chrono::Duration::hours(2),
            refresh_delay: Duration::from_millis(1_000),
        }
    }
}

#[derive(Default)]
struct DisruptionState {
    notifications: Vec<DelayNotification>,
    suggestions: HashMap<i64, Vec<RebookingSuggestion>>,
    phases: HashMap<i64, RebookPhase>,
}

/// Drives the delay-report / rebooking workflow against the backend.
///
/// Holds all workflow state in memory, keyed by booking id so operations on
/// different bookings never interfere; at most one operation is in flight
/// per booking. The state mutex is never held across an await.
pub struct DisruptionManager {
    recommendations: Arc<dyn RecommendationApi>,
    bookings: Arc<dyn BookingApi>,
    bus: RefreshBus,
    settings: DisruptionSettings,
    state: Mutex<DisruptionState>,
}

/// The subset of bookings eligible for delay simulation. The selectable set
/// is filtered before any call, so a non-CONFIRMED booking never reaches the
/// backend.
pub fn selectable_bookings(bookings: &[Booking]) -> Vec<&Booking> {
    bookings.iter().filter(|b| b.is_confirmed()).collect()
}

impl DisruptionManager {
    pub fn new(
        recommendations: Arc<dyn RecommendationApi>,
        bookings: Arc<dyn BookingApi>,
        bus: RefreshBus,
        settings: DisruptionSettings,
    ) -> Self {
        Self {
            recommendations,
            bookings,
            bus,
            settings,
            state: Mutex::new(DisruptionState::default()),
        }
    }

    /// Report a synthetic delay for a confirmed booking, then fetch the
    /// ranked alternatives.
    ///
    /// The suggestions fetch is only issued after the delay report is
    /// acknowledged. If the report succeeds but the fetch fails, the
    /// notification is kept and only the suggestions are missing — retry
    /// with [`fetch_suggestions`](Self::fetch_suggestions).
    pub async fn simulate_delay(
        &self,
        booking: &Booking,
    ) -> Result<DelayNotification, RebookError> {
        if !booking.is_confirmed() {
            return Err(RebookError::NotConfirmed);
        }
        let flight_id = booking
            .resolved_flight_id()
            .ok_or(RebookError::MissingFlight)?;

        self.begin(booking.id, RebookPhase::Simulating)?;

        let now = Utc::now();
        let report = DelayReport {
            booking_id: booking.id,
            flight_id,
            reason: self.settings.reason.clone(),
            original_departure_time: now,
            new_departure_time: now + self.settings.delay_offset,
        };

        if let Err(err) = self.recommendations.report_delay(&report).await {
            tracing::warn!("Delay report for booking {} failed: {}", booking.id, err);
            self.set_phase(booking.id, RebookPhase::Error);
            return Err(err.into());
        }

        let notification = DelayNotification::from_report(&report);
        {
            let mut state = self.state.lock().unwrap();
            state.notifications.push(notification.clone());
        }
        tracing::info!(
            "Recorded delay for booking {} (+{} min)",
            booking.id,
            notification.delay_minutes()
        );

        match self.recommendations.rebooking_suggestions(booking.id).await {
            Ok(response) => {
                let mut state = self.state.lock().unwrap();
                state.suggestions.insert(booking.id, response.suggestions);
                state.phases.insert(booking.id, RebookPhase::DelayActive);
                Ok(notification)
            }
            Err(err) => {
                // Partial success: the delay stands, only the alternatives
                // are missing.
                tracing::warn!(
                    "Suggestions fetch for booking {} failed: {}",
                    booking.id,
                    err
                );
                self.set_phase(booking.id, RebookPhase::Error);
                Err(err.into())
            }
        }
    }

    /// Retry the suggestions fetch for a booking whose delay is already
    /// recorded.
    pub async fn fetch_suggestions(&self, booking_id: i64) -> Result<usize, RebookError> {
        {
            let state = self.state.lock().unwrap();
            if !state.notifications.iter().any(|n| n.booking_id == booking_id) {
                return Err(RebookError::NoActiveDelay);
            }
        }
        self.begin(booking_id, RebookPhase::Simulating)?;

        match self.recommendations.rebooking_suggestions(booking_id).await {
            Ok(response) => {
                let count = response.suggestions.len();
                let mut state = self.state.lock().unwrap();
                state.suggestions.insert(booking_id, response.suggestions);
                state.phases.insert(booking_id, RebookPhase::DelayActive);
                Ok(count)
            }
            Err(err) => {
                self.set_phase(booking_id, RebookPhase::Error);
                Err(err.into())
            }
        }
    }

    /// Atomically swap the booking onto `flight_id`.
    ///
    /// The flight id comes from a previously offered suggestion and is
    /// trusted here without re-checking membership in the current suggestion
    /// set; the backend must validate it as untrusted input. On success the
    /// booking's notification and suggestions are discarded and a refresh
    /// broadcast is scheduled after the configured debounce. On failure both
    /// are left intact so another suggestion can be tried.
    pub async fn rebook(&self, booking_id: i64, flight_id: i64) -> Result<(), RebookError> {
        let prior = self.begin(booking_id, RebookPhase::Rebooking)?;

        match self.bookings.change_flight(booking_id, flight_id).await {
            Ok(_) => {
                {
                    let mut state = self.state.lock().unwrap();
                    state.notifications.retain(|n| n.booking_id != booking_id);
                    state.suggestions.remove(&booking_id);
                    state.phases.insert(booking_id, RebookPhase::Idle);
                }
                tracing::info!("Rebooked booking {} onto flight {}", booking_id, flight_id);
                self.bus.trigger_after(self.settings.refresh_delay);
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Rebooking of booking {} failed: {}", booking_id, err);
                self.set_phase(booking_id, prior);
                Err(err.into())
            }
        }
    }

    /// Return an errored booking to Idle once the failure has been shown.
    pub fn acknowledge_error(&self, booking_id: i64) {
        let mut state = self.state.lock().unwrap();
        if state.phases.get(&booking_id) == Some(&RebookPhase::Error) {
            state.phases.insert(booking_id, RebookPhase::Idle);
        }
    }

    pub fn phase(&self, booking_id: i64) -> RebookPhase {
        self.state
            .lock()
            .unwrap()
            .phases
            .get(&booking_id)
            .copied()
            .unwrap_or(RebookPhase::Idle)
    }

    /// All active delay notifications, newest last.
    pub fn notifications(&self) -> Vec<DelayNotification> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn notification_for(&self, booking_id: i64) -> Option<DelayNotification> {
        self.state
            .lock()
            .unwrap()
            .notifications
            .iter()
            .rev()
            .find(|n| n.booking_id == booking_id)
            .cloned()
    }

    /// Suggestions in backend order; no client-side re-sorting.
    pub fn suggestions_for(&self, booking_id: i64) -> Vec<RebookingSuggestion> {
        self.state
            .lock()
            .unwrap()
            .suggestions
            .get(&booking_id)
            .cloned()
            .unwrap_or_default()
    }

    /// The backend's best option (`priority == 1`), if it offered one.
    pub fn best_option(&self, booking_id: i64) -> Option<RebookingSuggestion> {
        self.state
            .lock()
            .unwrap()
            .suggestions
            .get(&booking_id)
            .and_then(|s| s.iter().find(|x| x.is_best_option()))
            .cloned()
    }

    /// Gate one operation per booking: record the new phase and hand back
    /// the prior one for restoration on failure.
    fn begin(&self, booking_id: i64, next: RebookPhase) -> Result<RebookPhase, RebookError> {
        let mut state = self.state.lock().unwrap();
        let prior = state
            .phases
            .get(&booking_id)
            .copied()
            .unwrap_or(RebookPhase::Idle);
        if matches!(prior, RebookPhase::Simulating | RebookPhase::Rebooking) {
            return Err(RebookError::OperationInProgress);
        }
        state.phases.insert(booking_id, next);
        Ok(prior)
    }

    fn set_phase(&self, booking_id: i64, phase: RebookPhase) {
        self.state.lock().unwrap().phases.insert(booking_id, phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerolink_core::error::ApiResult;
    use aerolink_shared::{BookingStatus, Flight, SuggestionsResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockBackend {
        report_calls: AtomicUsize,
        suggestion_calls: AtomicUsize,
        rebook_calls: AtomicUsize,
        fail_report: AtomicBool,
        fail_suggestions: AtomicBool,
        fail_rebook: AtomicBool,
        offered: Mutex<Vec<RebookingSuggestion>>,
        last_report: Mutex<Option<DelayReport>>,
        last_rebook: Mutex<Option<(i64, i64)>>,
    }

    #[async_trait]
    impl RecommendationApi for MockBackend {
        async fn report_delay(&self, report: &DelayReport) -> ApiResult<()> {
            self.report_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_report.load(Ordering::SeqCst) {
                return Err(ApiError::Server { status: 500 });
            }
            *self.last_report.lock().unwrap() = Some(report.clone());
            Ok(())
        }

        async fn rebooking_suggestions(&self, _booking_id: i64) -> ApiResult<SuggestionsResponse> {
            self.suggestion_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_suggestions.load(Ordering::SeqCst) {
                return Err(ApiError::Server { status: 503 });
            }
            Ok(SuggestionsResponse {
                notification_id: Some(1),
                reason: None,
                original_departure_time: None,
                new_departure_time: None,
                suggestions: self.offered.lock().unwrap().clone(),
            })
        }
    }

    #[async_trait]
    impl BookingApi for MockBackend {
        async fn my_bookings(&self) -> ApiResult<Vec<Booking>> {
            Ok(Vec::new())
        }

        async fn change_flight(&self, booking_id: i64, flight_id: i64) -> ApiResult<Booking> {
            self.rebook_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_rebook.load(Ordering::SeqCst) {
                return Err(ApiError::Validation {
                    status: 409,
                    message: "Flight is full".to_string(),
                });
            }
            *self.last_rebook.lock().unwrap() = Some((booking_id, flight_id));
            Ok(booking(booking_id, flight_id, BookingStatus::Confirmed))
        }
    }

    fn flight(id: i64) -> Flight {
        Flight {
            id,
            origin: "New York".to_string(),
            destination: "London".to_string(),
            departure_time: Utc::now(),
            arrival_time: None,
            available_seats: 10,
            price: None,
        }
    }

    fn booking(id: i64, flight_id: i64, status: BookingStatus) -> Booking {
        Booking {
            id,
            flight_id: Some(flight_id),
            flight: Some(flight(flight_id)),
            status,
        }
    }

    fn suggestion(flight_id: i64, priority: i32) -> RebookingSuggestion {
        RebookingSuggestion {
            flight_id,
            origin: "New York".to_string(),
            destination: "London".to_string(),
            departure_time: Utc::now(),
            arrival_time: Utc::now() + chrono::Duration::hours(7),
            available_seats: 5,
            price: 249.99,
            priority,
        }
    }

    fn manager(backend: Arc<MockBackend>) -> DisruptionManager {
        DisruptionManager::new(
            backend.clone(),
            backend,
            RefreshBus::new(),
            DisruptionSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_non_confirmed_booking_never_hits_the_network() {
        let backend = Arc::new(MockBackend::default());
        let manager = manager(backend.clone());

        for status in [
            BookingStatus::Delayed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            let err = manager
                .simulate_delay(&booking(1, 1, status))
                .await
                .unwrap_err();
            assert!(matches!(err, RebookError::NotConfirmed));
        }

        assert_eq!(backend.report_calls.load(Ordering::SeqCst), 0);
        assert_eq!(backend.suggestion_calls.load(Ordering::SeqCst), 0);
        assert_eq!(manager.phase(1), RebookPhase::Idle);
    }

    #[tokio::test]
    async fn test_selectable_bookings_filters_to_confirmed() {
        let bookings = vec![
            booking(1, 1, BookingStatus::Confirmed),
            booking(2, 2, BookingStatus::Delayed),
            booking(3, 3, BookingStatus::Cancelled),
        ];
        let selectable = selectable_bookings(&bookings);
        assert_eq!(selectable.len(), 1);
        assert_eq!(selectable[0].id, 1);
    }

    #[tokio::test]
    async fn test_simulate_delay_records_notification_and_suggestions() {
        let backend = Arc::new(MockBackend::default());
        *backend.offered.lock().unwrap() = vec![suggestion(2, 1), suggestion(3, 2)];
        let manager = manager(backend.clone());

        let notification = manager
            .simulate_delay(&booking(1, 1, BookingStatus::Confirmed))
            .await
            .unwrap();

        assert_eq!(notification.booking_id, 1);
        assert_eq!(notification.flight_id, 1);
        assert_eq!(notification.reason, "Technical issues with aircraft");
        assert_eq!(notification.delay_minutes(), 120);

        assert_eq!(manager.phase(1), RebookPhase::DelayActive);
        assert_eq!(manager.suggestions_for(1).len(), 2);
        assert_eq!(manager.best_option(1).unwrap().flight_id, 2);

        // Strict sequencing: one report, then one fetch.
        assert_eq!(backend.report_calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.suggestion_calls.load(Ordering::SeqCst), 1);

        let report = backend.last_report.lock().unwrap().clone().unwrap();
        assert!(report.new_departure_time > report.original_departure_time);
    }

    #[tokio::test]
    async fn test_report_failure_leaves_no_partial_notification() {
        let backend = Arc::new(MockBackend::default());
        backend.fail_report.store(true, Ordering::SeqCst);
        let manager = manager(backend.clone());

        let err = manager
            .simulate_delay(&booking(1, 1, BookingStatus::Confirmed))
            .await
            .unwrap_err();
        assert_eq!(
            err.simulate_failure_message(),
            "Failed to simulate delay: Server error. Please try again later."
        );

        assert!(manager.notifications().is_empty());
        assert_eq!(manager.phase(1), RebookPhase::Error);
        // No suggestions fetch after a failed report.
        assert_eq!(backend.suggestion_calls.load(Ordering::SeqCst), 0);

        manager.acknowledge_error(1);
        assert_eq!(manager.phase(1), RebookPhase::Idle);
    }

    #[tokio::test]
    async fn test_suggestions_failure_keeps_the_notification() {
        let backend = Arc::new(MockBackend::default());
        backend.fail_suggestions.store(true, Ordering::SeqCst);
        let manager = manager(backend.clone());

        let err = manager
            .simulate_delay(&booking(1, 1, BookingStatus::Confirmed))
            .await
            .unwrap_err();
        assert!(matches!(err, RebookError::Api(ApiError::Server { .. })));

        // Lenient partial success: the delay stands without alternatives.
        assert_eq!(manager.notifications().len(), 1);
        assert!(manager.suggestions_for(1).is_empty());
        assert_eq!(manager.phase(1), RebookPhase::Error);

        // The fetch can be retried independently.
        backend.fail_suggestions.store(false, Ordering::SeqCst);
        *backend.offered.lock().unwrap() = vec![suggestion(2, 1)];
        let count = manager.fetch_suggestions(1).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(manager.phase(1), RebookPhase::DelayActive);
    }

    #[tokio::test]
    async fn test_fetch_suggestions_requires_an_active_delay() {
        let backend = Arc::new(MockBackend::default());
        let manager = manager(backend.clone());
        let err = manager.fetch_suggestions(9).await.unwrap_err();
        assert!(matches!(err, RebookError::NoActiveDelay));
        assert_eq!(backend.suggestion_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_rebook_discards_workflow_state() {
        let backend = Arc::new(MockBackend::default());
        *backend.offered.lock().unwrap() = vec![suggestion(2, 1)];
        let manager = manager(backend.clone());

        manager
            .simulate_delay(&booking(1, 1, BookingStatus::Confirmed))
            .await
            .unwrap();
        manager.rebook(1, 2).await.unwrap();

        assert!(manager.notification_for(1).is_none());
        assert!(manager.suggestions_for(1).is_empty());
        assert_eq!(manager.phase(1), RebookPhase::Idle);
        assert_eq!(*backend.last_rebook.lock().unwrap(), Some((1, 2)));
    }

    #[tokio::test]
    async fn test_failed_rebook_leaves_state_intact() {
        let backend = Arc::new(MockBackend::default());
        *backend.offered.lock().unwrap() = vec![suggestion(2, 1), suggestion(3, 2)];
        let manager = manager(backend.clone());

        manager
            .simulate_delay(&booking(1, 1, BookingStatus::Confirmed))
            .await
            .unwrap();

        backend.fail_rebook.store(true, Ordering::SeqCst);
        let err = manager.rebook(1, 2).await.unwrap_err();
        assert_eq!(
            err.rebook_failure_message(),
            "Rebooking failed: This resource already exists. Please try a different option."
        );

        // Notification and both suggestions survive for a retry.
        assert!(manager.notification_for(1).is_some());
        assert_eq!(manager.suggestions_for(1).len(), 2);
        assert_eq!(manager.phase(1), RebookPhase::DelayActive);

        // Retrying with the other suggestion works.
        backend.fail_rebook.store(false, Ordering::SeqCst);
        manager.rebook(1, 3).await.unwrap();
        assert_eq!(*backend.last_rebook.lock().unwrap(), Some((1, 3)));
        assert_eq!(manager.phase(1), RebookPhase::Idle);
    }

    #[tokio::test]
    async fn test_one_operation_per_booking() {
        let backend = Arc::new(MockBackend::default());
        let manager = manager(backend.clone());

        // Force the phase into Simulating as an in-flight operation would.
        manager.begin(1, RebookPhase::Simulating).unwrap();

        let err = manager
            .simulate_delay(&booking(1, 1, BookingStatus::Confirmed))
            .await
            .unwrap_err();
        assert!(matches!(err, RebookError::OperationInProgress));

        let err = manager.rebook(1, 2).await.unwrap_err();
        assert!(matches!(err, RebookError::OperationInProgress));

        // A different booking is unaffected.
        manager
            .simulate_delay(&booking(2, 5, BookingStatus::Confirmed))
            .await
            .unwrap();
        assert_eq!(manager.phase(2), RebookPhase::DelayActive);
    }

    #[tokio::test]
    async fn test_suggestion_order_is_backend_order() {
        let backend = Arc::new(MockBackend::default());
        // Backend returns priority 2 first; the client must not re-sort.
        *backend.offered.lock().unwrap() = vec![suggestion(3, 2), suggestion(2, 1)];
        let manager = manager(backend.clone());

        manager
            .simulate_delay(&booking(1, 1, BookingStatus::Confirmed))
            .await
            .unwrap();

        let suggestions = manager.suggestions_for(1);
        assert_eq!(suggestions[0].flight_id, 3);
        assert_eq!(suggestions[1].flight_id, 2);
        assert_eq!(manager.best_option(1).unwrap().flight_id, 2);
    }
}
