use async_trait::async_trait;

use aerolink_shared::{Booking, DelayReport, SuggestionsResponse};

use crate::error::ApiResult;

/// Booking operations the rebooking workflow depends on.
///
/// Implemented by the HTTP client; mock implementations stand in for the
/// backend in tests.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn my_bookings(&self) -> ApiResult<Vec<Booking>>;

    /// `PUT /api/bookings/:id` — atomically replace the booking's flight.
    async fn change_flight(&self, booking_id: i64, flight_id: i64) -> ApiResult<Booking>;
}

/// Delay-reporting and suggestion operations of the recommendation service.
#[async_trait]
pub trait RecommendationApi: Send + Sync {
    /// `POST /api/recommendations/notify-delay`.
    async fn report_delay(&self, report: &DelayReport) -> ApiResult<()>;

    /// `GET /api/recommendations/suggestions?bookingId=ID` — ranked
    /// alternative flights, backend ordering authoritative.
    async fn rebooking_suggestions(&self, booking_id: i64) -> ApiResult<SuggestionsResponse>;
}
