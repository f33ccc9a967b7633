use aerolink_core::error::{ApiError, ApiResult};
use aerolink_shared::{ProfileUpdate, UserProfile};

use crate::ApiClient;

// The profile resource moved between backend snapshots; both paths are live
// in the wild, so a 404 on the current one falls back to the older one.
const PROFILE_PATH: &str = "/api/user/profile";
const LEGACY_PROFILE_PATH: &str = "/api/users/profile";

fn is_not_found(error: &ApiError) -> bool {
    matches!(error, ApiError::Validation { status: 404, .. })
}

impl ApiClient {
    /// `GET /api/user/profile` (falling back to `/api/users/profile`).
    pub async fn profile(&self) -> ApiResult<UserProfile> {
        match self.get_json(PROFILE_PATH).await {
            Err(ref err) if is_not_found(err) => self.get_json(LEGACY_PROFILE_PATH).await,
            other => other,
        }
    }

    /// `PUT /api/user/profile` (falling back to `/api/users/profile`).
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        match self.put_json(PROFILE_PATH, update).await {
            Err(ref err) if is_not_found(err) => self.put_json(LEGACY_PROFILE_PATH, update).await,
            other => other,
        }
    }

    /// `DELETE /api/user/profile` — removes the account. The session is not
    /// cleared here; callers log out explicitly once the backend confirms.
    pub async fn delete_account(&self) -> ApiResult<()> {
        match self.delete_empty(PROFILE_PATH).await {
            Err(ref err) if is_not_found(err) => self.delete_empty(LEGACY_PROFILE_PATH).await,
            other => other,
        }
    }
}
