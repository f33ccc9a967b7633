use aerolink_core::error::ApiResult;
use aerolink_shared::Flight;

use crate::ApiClient;

impl ApiClient {
    /// `GET /api/flights`. Public; the result is the session's flight cache
    /// and is refetched periodically rather than mutated.
    pub async fn flights(&self) -> ApiResult<Vec<Flight>> {
        self.get_json("/api/flights").await
    }
}
