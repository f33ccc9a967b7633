use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pii::Redacted;

/// The single persisted session entry.
///
/// Invariant: when present, `token` is a well-formed three-part JWT-like
/// string; absence of the entry means unauthenticated. `user_id` and
/// `expires_at` are both optional because different backend snapshots return
/// one or the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub token: Redacted<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthData {
    pub fn new(token: impl Into<Redacted<String>>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
            user_id: None,
            expires_at: None,
        }
    }

    /// Shape check only: three dot-separated non-empty segments. Signature
    /// verification happens in the backend, never here.
    pub fn has_well_formed_token(&self) -> bool {
        let token = self.token.as_str();
        let parts: Vec<&str> = token.split('.').collect();
        parts.len() == 3 && parts.iter().all(|p| !p.is_empty())
    }
}

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: Redacted<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: i64,
}

/// Response of `POST /api/login`: `{token, email, user.id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: Redacted<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<LoginUser>,
}

impl LoginResponse {
    pub fn into_auth_data(self) -> AuthData {
        AuthData {
            token: self.token,
            email: self.email,
            user_id: self.user.map(|u| u.id.to_string()),
            expires_at: None,
        }
    }
}

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: Redacted<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Profile as served by `GET /api/user/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of `PUT /api/user/profile`; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<Redacted<String>>,
}
