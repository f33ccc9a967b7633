use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use aerolink_core::error::{ApiError, ApiResult, ErrorBody};
use aerolink_store::app_config::ApiConfig;
use aerolink_store::SessionManager;

pub mod auth;
pub mod bookings;
pub mod flights;
pub mod profile;
pub mod recommendations;

type LogoutHook = Arc<dyn Fn() + Send + Sync>;

/// HTTP wrapper over the booking backend.
///
/// Attaches the session's bearer token to every outgoing request and funnels
/// every response through one dispatch point: connection failures become
/// [`ApiError::Network`], a 401 clears the persisted session and fires the
/// forced-logout hook, and remaining statuses are classified by family.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
    on_unauthorized: RwLock<Option<LogoutHook>>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionManager>,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            on_unauthorized: RwLock::new(None),
        })
    }

    pub fn from_config(config: &ApiConfig, session: Arc<SessionManager>) -> ApiResult<Self> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_seconds),
            session,
        )
    }

    /// Hook invoked after a 401 has cleared the session; the caller uses it
    /// to navigate back to an unauthenticated view.
    pub fn on_unauthorized(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_unauthorized.write().unwrap() = Some(Arc::new(hook));
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request with the bearer token attached (when a session
    /// exists) and classify any failure.
    async fn dispatch(&self, request: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::detail);
        let error = ApiError::from_status(status.as_u16(), detail);

        if error.is_auth_error() {
            self.force_logout().await;
        }

        Err(error)
    }

    /// 401 handling: drop the persisted session, then let the registered
    /// hook steer the user to an unauthenticated view.
    async fn force_logout(&self) {
        tracing::warn!("Backend returned 401; clearing session");
        if let Err(err) = self.session.clear().await {
            tracing::error!("Failed to clear session after 401: {}", err);
        }
        let hook = self.on_unauthorized.read().unwrap().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.dispatch(self.http.get(self.url(path))).await?;
        decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.dispatch(self.http.post(self.url(path)).json(body)).await?;
        decode(response).await
    }

    pub(crate) async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.dispatch(self.http.post(self.url(path)).json(body)).await?;
        Ok(())
    }

    pub(crate) async fn post_empty(&self, path: &str) -> ApiResult<()> {
        self.dispatch(self.http.post(self.url(path))).await?;
        Ok(())
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.dispatch(self.http.put(self.url(path)).json(body)).await?;
        decode(response).await
    }

    pub(crate) async fn delete_empty(&self, path: &str) -> ApiResult<()> {
        self.dispatch(self.http.delete(self.url(path))).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Network(format!("Failed to decode response body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerolink_store::MemorySessionStore;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let session = Arc::new(SessionManager::new(Arc::new(MemorySessionStore::new())));
        let client =
            ApiClient::new("http://localhost:8081/", Duration::from_secs(10), session).unwrap();
        assert_eq!(client.url("/api/flights"), "http://localhost:8081/api/flights");
    }
}
