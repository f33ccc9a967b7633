use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A flight as returned by `GET /api/flights`.
///
/// Immutable from the client's perspective within a session; the list is
/// refetched periodically rather than patched in place. Older backend
/// snapshots use `from`/`to`/`time` for the route fields, so those are
/// accepted as aliases on input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: i64,
    #[serde(alias = "from")]
    pub origin: String,
    #[serde(alias = "to")]
    pub destination: String,
    #[serde(alias = "time")]
    pub departure_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub available_seats: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Flight {
    /// Route label used in logs and booking summaries.
    pub fn route(&self) -> String {
        format!("{} -> {}", self.origin, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_deserialization() {
        let json = r#"
            {
                "id": 1,
                "origin": "New York",
                "destination": "London",
                "departureTime": "2025-12-25T10:30:00Z",
                "availableSeats": 42
            }
        "#;
        let flight: Flight = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(flight.id, 1);
        assert_eq!(flight.origin, "New York");
        assert_eq!(flight.available_seats, 42);
        assert!(flight.arrival_time.is_none());
    }

    #[test]
    fn test_flight_legacy_field_aliases() {
        let json = r#"
            {
                "id": 7,
                "from": "Paris",
                "to": "Rome",
                "time": "2025-11-01T08:00:00Z"
            }
        "#;
        let flight: Flight = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(flight.origin, "Paris");
        assert_eq!(flight.destination, "Rome");
        assert_eq!(flight.route(), "Paris -> Rome");
    }
}
