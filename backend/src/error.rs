//! Error types and error handling for the application
//!
//! Every failure coming back from the generative service is normalized into
//! one [`AppError`] variant. Classification prefers structured information
//! (HTTP status, the API's `error.status` code, block and finish reasons)
//! and only falls back to matching known substrings in the raw message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// The API key was rejected or lacks permission
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    /// Quota or rate limit exhausted
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The service is overloaded or temporarily down
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The safety filter blocked the prompt or the output
    #[error("Content blocked: {0}")]
    ContentBlocked(String),

    /// Response text was empty or could not be parsed as the expected JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The response carried no image or video payload
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// The video job reached a terminal error state (job's own text)
    #[error("{0}")]
    JobFailed(String),

    /// Video polling exceeded its wait budget
    #[error("Timed out after {0} seconds waiting for the video job")]
    TimeoutExceeded(u64),

    /// The operation was cancelled by the caller
    #[error("Operation cancelled")]
    Cancelled,

    /// Caller-supplied input was rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Any other failed request, carrying the raw error text
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Local file error while materializing or exporting a result
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (catch-all for unexpected errors)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Flat classification of [`AppError`], cheap to copy into view state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ErrorKind {
    AuthenticationFailure,
    RateLimited,
    ServiceUnavailable,
    ContentBlocked,
    MalformedResponse,
    EmptyResult,
    JobFailed,
    TimeoutExceeded,
    Cancelled,
    InvalidInput,
    RequestFailed,
    Io,
    Internal,
}

impl AppError {
    /// Project the error onto its kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::AuthenticationFailure(_) => ErrorKind::AuthenticationFailure,
            AppError::RateLimited(_) => ErrorKind::RateLimited,
            AppError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            AppError::ContentBlocked(_) => ErrorKind::ContentBlocked,
            AppError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            AppError::EmptyResult(_) => ErrorKind::EmptyResult,
            AppError::JobFailed(_) => ErrorKind::JobFailed,
            AppError::TimeoutExceeded(_) => ErrorKind::TimeoutExceeded,
            AppError::Cancelled => ErrorKind::Cancelled,
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::RequestFailed(_) => ErrorKind::RequestFailed,
            AppError::Io(_) => ErrorKind::Io,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the UI should offer to change the API key
    pub fn needs_credential_change(&self) -> bool {
        self.kind() == ErrorKind::AuthenticationFailure
    }

    /// Normalize a non-success HTTP response
    ///
    /// The body is inspected for the API's structured error envelope
    /// (`{"error": {"code", "message", "status"}}`) before falling back to
    /// the status code, and finally to substring matching.
    pub fn from_http(status: u16, body: &str) -> Self {
        let envelope = serde_json::from_str::<ApiErrorEnvelope>(body).ok();
        let message = envelope
            .as_ref()
            .and_then(|e| e.error.message.clone())
            .unwrap_or_else(|| body.to_string());

        if let Some(code) = envelope.as_ref().and_then(|e| e.error.status.as_deref()) {
            if let Some(error) = Self::from_status_code(code, &message) {
                return error;
            }
        }

        match status {
            401 | 403 => AppError::AuthenticationFailure(message),
            429 => AppError::RateLimited(message),
            500 | 502 | 503 | 504 => AppError::ServiceUnavailable(message),
            _ => Self::classify_message(&format!("HTTP {}: {}", status, message)),
        }
    }

    /// Map a canonical API status code (e.g. `RESOURCE_EXHAUSTED`)
    fn from_status_code(code: &str, message: &str) -> Option<Self> {
        let message = message.to_string();
        match code {
            "UNAUTHENTICATED" | "PERMISSION_DENIED" => Some(AppError::AuthenticationFailure(message)),
            "RESOURCE_EXHAUSTED" => Some(AppError::RateLimited(message)),
            "UNAVAILABLE" | "DEADLINE_EXCEEDED" | "INTERNAL" => {
                Some(AppError::ServiceUnavailable(message))
            }
            _ => None,
        }
    }

    /// Last-resort classification from raw error text
    pub fn classify_message(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let text = raw.to_string();

        if lower.contains("api key not valid")
            || lower.contains("api_key_invalid")
            || lower.contains("requested entity was not found")
            || lower.contains("permission denied")
            || lower.contains("unauthenticated")
        {
            AppError::AuthenticationFailure(text)
        } else if lower.contains("429")
            || lower.contains("quota")
            || lower.contains("resource_exhausted")
            || lower.contains("rate limit")
        {
            AppError::RateLimited(text)
        } else if lower.contains("503") || lower.contains("overloaded") || lower.contains("unavailable")
        {
            AppError::ServiceUnavailable(text)
        } else if lower.contains("safety") || lower.contains("blocked") {
            AppError::ContentBlocked(text)
        } else {
            AppError::RequestFailed(text)
        }
    }

    /// Human-readable message shown next to the retry affordance
    pub fn user_message(&self) -> String {
        match self {
            AppError::AuthenticationFailure(_) => {
                "The API key was rejected. Choose a different key and try again.".to_string()
            }
            AppError::RateLimited(_) => {
                "The service quota is exhausted right now. Wait a moment and retry.".to_string()
            }
            AppError::ServiceUnavailable(_) => {
                "The service is temporarily unavailable. Please retry.".to_string()
            }
            AppError::ContentBlocked(_) => {
                "The request was blocked by the safety filter. Try a different location.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Snapshot for storage in view state
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.user_message(),
        }
    }
}

/// Cloneable error snapshot kept by the view state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Classified kind
    pub kind: ErrorKind,
    /// Message for display
    pub message: String,
}

impl ErrorReport {
    /// Whether a retry with the same inputs is offered
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind, ErrorKind::InvalidInput | ErrorKind::Cancelled)
    }

    /// Whether the "change credential" affordance is offered
    pub fn needs_credential_change(&self) -> bool {
        self.kind == ErrorKind::AuthenticationFailure
    }
}

impl From<&AppError> for ErrorReport {
    fn from(error: &AppError) -> Self {
        error.report()
    }
}

#[derive(Deserialize, Debug)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}
