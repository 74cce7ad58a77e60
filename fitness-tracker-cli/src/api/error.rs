use reqwest::StatusCode;
use thiserror::Error;

/// API-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rejected by server: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let msg = server_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(msg),
            StatusCode::FORBIDDEN => ApiError::Forbidden(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            status if status.is_server_error() => ApiError::ServerError(msg),
            status if status.is_client_error() => ApiError::Validation(msg),
            _ => ApiError::InvalidResponse(msg),
        }
    }

    /// Same as [`ApiError::from_status`] but for the credential endpoints,
    /// where 400/401 mean the credentials were rejected
    pub fn from_auth_status(status: StatusCode, body: String) -> Self {
        match Self::from_status(status, body) {
            ApiError::Unauthorized(msg) if status == StatusCode::UNAUTHORIZED => {
                ApiError::AuthenticationFailed(msg)
            }
            ApiError::Validation(msg) if status == StatusCode::BAD_REQUEST => {
                ApiError::AuthenticationFailed(msg)
            }
            other => other,
        }
    }

    /// The server no longer accepts the session credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

/// Pull a human readable message out of an error body.
///
/// Express-style backends answer `{"message": "..."}` or `{"error": "..."}`;
/// anything else is used verbatim when short enough to show.
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "msg"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }
    }

    if body.len() <= 200 && !body.starts_with('<') {
        Some(body.to_string())
    } else {
        None
    }
}
