//! Failures surfaced by the SDK
//!
//! Every failure the client can observe maps onto [`SdkError`]. The
//! listing and option loader recover from these locally; the detail
//! page treats [`SdkError::NotFound`] as terminal.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    /// Non-success status with no more specific variant
    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Too many requests, retry in {retry_after}s")]
    RateLimited { retry_after: u64 },

    /// No session, or the session expired
    #[error("Not signed in: {0}")]
    AuthenticationError(String),

    /// Signed in but not allowed, e.g. deleting someone else's recipe
    #[error("Not allowed: {0}")]
    AuthorizationError(String),

    #[error("{resource_type} {resource_id} not found")]
    NotFound {
        resource_type: String,
        resource_id: String,
    },

    /// Rejected input, client side or from a 400/422
    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    #[error("Malformed JSON: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// e.g. a second review of the same recipe
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

pub type SdkResult<T> = Result<T, SdkError>;

/// Error body of the API routes: `{"error": "..."}`, sometimes with a
/// human readable `message` next to it
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    message: Option<String>,
}

impl SdkError {
    /// Classify a non-success response by status, taking the message from
    /// the JSON error body when there is one and the raw text otherwise
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.message.unwrap_or(parsed.error),
            Err(_) => body.trim().to_string(),
        };

        match status {
            400 | 422 => SdkError::ValidationError(message),
            401 => SdkError::AuthenticationError(message),
            403 => SdkError::AuthorizationError(message),
            404 => SdkError::NotFound {
                resource_type: "resource".to_string(),
                resource_id: "unknown".to_string(),
            },
            409 => SdkError::Conflict(message),
            429 => SdkError::RateLimited { retry_after: 60 },
            500..=599 => SdkError::ServerError(message),
            _ => SdkError::ApiError { status, message },
        }
    }

    pub fn recipe_not_found(id: impl Into<String>) -> Self {
        SdkError::NotFound {
            resource_type: "recipe".to_string(),
            resource_id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SdkError::NotFound { .. })
    }

    /// The HTTP status this error stands for, if it came from a response
    pub fn status_code(&self) -> Option<u16> {
        let status = match self {
            SdkError::ApiError { status, .. } => *status,
            SdkError::ValidationError(_) => 422,
            SdkError::AuthenticationError(_) => 401,
            SdkError::AuthorizationError(_) => 403,
            SdkError::NotFound { .. } => 404,
            SdkError::Conflict(_) => 409,
            SdkError::RateLimited { .. } => 429,
            SdkError::ServerError(_) => 500,
            _ => return None,
        };
        Some(status)
    }
}

impl From<validator::ValidationErrors> for SdkError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SdkError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(SdkError::from_response(404, r#"{"error": "Recipe not found"}"#).is_not_found());

        let error = SdkError::from_response(403, r#"{"error": "Forbidden"}"#);
        assert!(matches!(error, SdkError::AuthorizationError(ref m) if m == "Forbidden"));

        let error = SdkError::from_response(409, r#"{"error": "Already reviewed"}"#);
        assert!(matches!(error, SdkError::Conflict(_)));
    }

    #[test]
    fn test_message_wins_over_error_code() {
        let body = r#"{"error": "invalid_rating", "message": "Ocjena mora biti između 1 i 5"}"#;
        let error = SdkError::from_response(400, body);
        assert!(
            matches!(error, SdkError::ValidationError(ref m) if m == "Ocjena mora biti između 1 i 5")
        );
    }

    #[test]
    fn test_plain_text_body() {
        let error = SdkError::from_response(418, "teapot\n");
        assert!(matches!(
            error,
            SdkError::ApiError { status: 418, ref message } if message == "teapot"
        ));
    }

    #[test]
    fn test_status_code() {
        let error = SdkError::AuthenticationError("session expired".to_string());
        assert_eq!(error.status_code(), Some(401));
        assert_eq!(SdkError::recipe_not_found("x").status_code(), Some(404));
        assert_eq!(SdkError::Timeout(30).status_code(), None);
    }
}
