use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;

/// Claims read from a token payload.
///
/// Only the fields needed for local expiry checks; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    pub exp: i64,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token is not a three-part JWT-like string")]
    Malformed,
    #[error("Token payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("Token payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Decode the payload of a bearer token without verifying the signature.
///
/// Verification is the backend's job; this exists purely so the client can
/// tell whether a stored session is worth presenting.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed);
    }

    let payload = general_purpose::URL_SAFE_NO_PAD.decode(parts[1])?;
    let claims: TokenClaims = serde_json::from_slice(&payload)?;
    Ok(claims)
}

/// Whether the token's `exp` has passed. A token that cannot be decoded is
/// treated as expired.
pub fn is_expired(token: &str) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp < Utc::now().timestamp(),
        Err(err) => {
            tracing::debug!("Treating undecodable token as expired: {}", err);
            true
        }
    }
}

/// The token's expiry instant, if it can be decoded.
pub fn expiration_time(token: &str) -> Option<DateTime<Utc>> {
    let claims = decode_claims(token).ok()?;
    Utc.timestamp_opt(claims.exp, 0).single()
}

/// Whether the token expires within `window` from now. Undecodable tokens
/// count as expiring.
pub fn expires_within(token: &str, window: Duration) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp < (Utc::now() + window).timestamp(),
        Err(_) => true,
    }
}
