use async_trait::async_trait;

use aerolink_core::error::ApiResult;
use aerolink_core::BookingApi;
use aerolink_shared::{Booking, BookingUpdateRequest, CreateBookingRequest};

use crate::ApiClient;

impl ApiClient {
    /// `GET /api/bookings/my`.
    pub async fn my_bookings(&self) -> ApiResult<Vec<Booking>> {
        self.get_json("/api/bookings/my").await
    }

    /// `POST /api/bookings`.
    pub async fn create_booking(&self, flight_id: i64) -> ApiResult<Booking> {
        self.post_json("/api/bookings", &CreateBookingRequest { flight_id })
            .await
    }

    /// `PUT /api/bookings/:id` — atomically replace the booking's flight.
    pub async fn update_booking(&self, booking_id: i64, flight_id: i64) -> ApiResult<Booking> {
        self.put_json(
            &format!("/api/bookings/{}", booking_id),
            &BookingUpdateRequest { flight_id },
        )
        .await
    }

    /// `POST /api/bookings/:id/cancel`.
    pub async fn cancel_booking(&self, booking_id: i64) -> ApiResult<()> {
        self.post_empty(&format!("/api/bookings/{}/cancel", booking_id))
            .await
    }
}

#[async_trait]
impl BookingApi for ApiClient {
    async fn my_bookings(&self) -> ApiResult<Vec<Booking>> {
        ApiClient::my_bookings(self).await
    }

    async fn change_flight(&self, booking_id: i64, flight_id: i64) -> ApiResult<Booking> {
        self.update_booking(booking_id, flight_id).await
    }
}
