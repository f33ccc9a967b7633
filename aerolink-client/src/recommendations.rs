use async_trait::async_trait;

use aerolink_core::error::ApiResult;
use aerolink_core::RecommendationApi;
use aerolink_shared::{DelayReport, SuggestionsResponse};

use crate::ApiClient;

impl ApiClient {
    /// `POST /api/recommendations/notify-delay`.
    pub async fn notify_delay(&self, report: &DelayReport) -> ApiResult<()> {
        self.post_unit("/api/recommendations/notify-delay", report)
            .await
    }

    /// `GET /api/recommendations/suggestions?bookingId=ID`.
    pub async fn rebooking_suggestions(&self, booking_id: i64) -> ApiResult<SuggestionsResponse> {
        self.get_json(&format!(
            "/api/recommendations/suggestions?bookingId={}",
            booking_id
        ))
        .await
    }
}

#[async_trait]
impl RecommendationApi for ApiClient {
    async fn report_delay(&self, report: &DelayReport) -> ApiResult<()> {
        self.notify_delay(report).await
    }

    async fn rebooking_suggestions(&self, booking_id: i64) -> ApiResult<SuggestionsResponse> {
        ApiClient::rebooking_suggestions(self, booking_id).await
    }
}
