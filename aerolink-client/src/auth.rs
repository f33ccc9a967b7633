use aerolink_core::error::ApiResult;
use aerolink_shared::{LoginRequest, LoginResponse, RegisterRequest};

use crate::ApiClient;

impl ApiClient {
    /// `POST /api/login`. Unauthenticated. The caller decides whether to
    /// persist the returned session (`SessionManager::save`).
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.into(),
        };
        let response: LoginResponse = self.post_json("/api/login", &request).await?;
        tracing::info!("Logged in as {}", response.email);
        Ok(response)
    }

    /// `POST /api/register`. Unauthenticated; the account still has to log
    /// in afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        self.post_unit("/api/register", request).await?;
        tracing::info!("Registered account {}", request.email);
        Ok(())
    }
}
