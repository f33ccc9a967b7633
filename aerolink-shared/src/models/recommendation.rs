use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/recommendations/notify-delay`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayReport {
    pub booking_id: i64,
    pub flight_id: i64,
    pub reason: String,
    pub original_departure_time: DateTime<Utc>,
    pub new_departure_time: DateTime<Utc>,
}

/// Client-side record of a reported delay.
///
/// Ephemeral: created when a delay report is accepted, destroyed on
/// successful rebooking, never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DelayNotification {
    pub id: Uuid,
    pub booking_id: i64,
    pub flight_id: i64,
    pub reason: String,
    pub original_departure_time: DateTime<Utc>,
    pub new_departure_time: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

impl DelayNotification {
    pub fn from_report(report: &DelayReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id: report.booking_id,
            flight_id: report.flight_id,
            reason: report.reason.clone(),
            original_departure_time: report.original_departure_time,
            new_departure_time: report.new_departure_time,
            timestamp: Utc::now(),
        }
    }

    /// Delay length in whole minutes.
    pub fn delay_minutes(&self) -> i64 {
        (self.new_departure_time - self.original_departure_time).num_minutes()
    }
}

/// One ranked alternative flight from the suggestions endpoint.
///
/// `priority == 1` marks the backend's best option. Ordering within the
/// response is authoritative; the client never re-sorts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RebookingSuggestion {
    pub flight_id: i64,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub available_seats: i32,
    pub price: f64,
    pub priority: i32,
}

impl RebookingSuggestion {
    pub fn is_best_option(&self) -> bool {
        self.priority == 1
    }
}

/// Envelope of `GET /api/recommendations/suggestions?bookingId=ID`.
///
/// A missing `suggestions` field is treated as an empty list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_departure_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_departure_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub suggestions: Vec<RebookingSuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_suggestions_envelope_with_missing_list() {
        let json = r#"{"notificationId": 5, "reason": "Weather"}"#;
        let response: SuggestionsResponse = serde_json::from_str(json).unwrap();
        assert!(response.suggestions.is_empty());
        assert_eq!(response.notification_id, Some(5));
    }

    #[test]
    fn test_suggestion_wire_format() {
        let json = r#"
            {
                "suggestions": [{
                    "flightId": 2,
                    "origin": "New York",
                    "destination": "London",
                    "departureTime": "2025-12-25T14:00:00Z",
                    "arrivalTime": "2025-12-25T22:00:00Z",
                    "availableSeats": 12,
                    "price": 249.99,
                    "priority": 1
                }]
            }
        "#;
        let response: SuggestionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.suggestions.len(), 1);
        assert!(response.suggestions[0].is_best_option());
        assert_eq!(response.suggestions[0].flight_id, 2);
    }

    #[test]
    fn test_notification_delay_minutes() {
        let report = DelayReport {
            booking_id: 1,
            flight_id: 1,
            reason: "Technical issues with aircraft".to_string(),
            original_departure_time: Utc::now(),
            new_departure_time: Utc::now() + Duration::hours(2),
        };
        let notification = DelayNotification::from_report(&report);
        assert_eq!(notification.delay_minutes(), 120);
        assert_eq!(notification.booking_id, 1);
    }
}
