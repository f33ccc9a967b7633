use serde::{Deserialize, Serialize};

use crate::models::flight::Flight;

/// Booking lifecycle as reported by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Delayed,
    Cancelled,
    Completed,
}

/// A booking owned by the backend; the client holds a transient cached copy
/// per session and refetches via `GET /api/bookings/my`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_id: Option<i64>,
    /// Embedded flight snapshot, present in most backend responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<Flight>,
    pub status: BookingStatus,
}

impl Booking {
    /// Resolve this booking's flight against the cached flight list, falling
    /// back to the embedded snapshot when the id lookup misses.
    pub fn resolve_flight<'a>(&'a self, flights: &'a [Flight]) -> Option<&'a Flight> {
        let wanted = self.resolved_flight_id()?;
        flights
            .iter()
            .find(|f| f.id == wanted)
            .or(self.flight.as_ref())
    }

    /// The flight id this booking references, from either the explicit field
    /// or the embedded snapshot.
    pub fn resolved_flight_id(&self) -> Option<i64> {
        self.flight_id.or_else(|| self.flight.as_ref().map(|f| f.id))
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// Body of `POST /api/bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub flight_id: i64,
}

/// Body of `PUT /api/bookings/:id` — atomically swaps the booking's flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdateRequest {
    pub flight_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn flight(id: i64, origin: &str, destination: &str) -> Flight {
        Flight {
            id,
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_time: Utc.with_ymd_and_hms(2025, 12, 25, 10, 30, 0).unwrap(),
            arrival_time: None,
            available_seats: 10,
            price: None,
        }
    }

    #[test]
    fn test_booking_status_wire_format() {
        let json = r#"{"id": 1, "status": "CONFIRMED", "flight": {"id": 2, "origin": "A", "destination": "B", "departureTime": "2025-12-25T10:30:00Z"}}"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.is_confirmed());
    }

    #[test]
    fn test_resolve_flight_prefers_cached_list() {
        let booking = Booking {
            id: 1,
            flight_id: Some(2),
            flight: Some(flight(2, "Stale", "Stale")),
            status: BookingStatus::Confirmed,
        };
        let cache = vec![flight(2, "New York", "London")];

        let resolved = booking.resolve_flight(&cache).unwrap();
        assert_eq!(resolved.origin, "New York");
    }

    #[test]
    fn test_resolve_flight_falls_back_to_embedded() {
        let booking = Booking {
            id: 1,
            flight_id: None,
            flight: Some(flight(9, "Oslo", "Bergen")),
            status: BookingStatus::Delayed,
        };

        // Cache misses id 9 entirely.
        let cache = [flight(3, "A", "B")];
        let resolved = booking.resolve_flight(&cache).unwrap();
        assert_eq!(resolved.origin, "Oslo");
    }

    #[test]
    fn test_resolve_flight_without_any_reference() {
        let booking = Booking {
            id: 1,
            flight_id: None,
            flight: None,
            status: BookingStatus::Cancelled,
        };
        assert!(booking.resolve_flight(&[]).is_none());
        assert!(booking.resolved_flight_id().is_none());
    }
}
