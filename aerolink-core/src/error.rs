use serde::Deserialize;

/// Failure taxonomy for every backend call.
///
/// All network failures are caught at the call site, classified here, and
/// surfaced as a human-readable string; none propagate unhandled. There are
/// no automatic retries anywhere — every retry is user-initiated.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// No response received at all.
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 401. Triggers forced logout at the client layer.
    #[error("Authentication failed")]
    Auth,

    /// 4xx other than 401, surfaced as a field-level or banner message.
    #[error("{message}")]
    Validation { status: u16, message: String },

    /// 5xx, generic retry-later message.
    #[error("Server error ({status})")]
    Server { status: u16 },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error body shape the backend uses: `{"error": ...}` or `{"message": ...}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn detail(self) -> Option<String> {
        self.message.or(self.error)
    }
}

impl ApiError {
    /// Classify a non-2xx status. `detail` is the backend's error body
    /// message when one could be parsed.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            401 => ApiError::Auth,
            400..=499 => ApiError::Validation {
                status,
                message: detail.unwrap_or_else(|| status_message(status).to_string()),
            },
            _ => ApiError::Server { status },
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Auth)
    }

    /// The fixed human-readable string shown inline for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ApiError::Auth => status_message(401).to_string(),
            ApiError::Validation { status, .. } => status_message(*status).to_string(),
            ApiError::Server { status } => status_message(*status).to_string(),
        }
    }
}

fn status_message(status: u16) -> &'static str {
    match status {
        400 => "Please check your input and try again.",
        401 => "Invalid email or password. Please check your credentials and try again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource could not be found.",
        409 => "This resource already exists. Please try a different option.",
        422 => "Please check your input and ensure all required fields are filled correctly.",
        500 => "Server error. Please try again later.",
        503 => "Service temporarily unavailable. Please try again later.",
        _ => "An error occurred. Please try again.",
    }
}
