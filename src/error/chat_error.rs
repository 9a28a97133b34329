//! The error type returned by every client operation.

use thiserror::Error;

use crate::traits::HttpError;

/// Failures surfaced to the caller of a chat, image or model request.
///
/// Malformed event payloads never appear here; the decoder emits them as
/// raw text instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChatError {
    /// Network failure, or the body broke off mid-stream.
    #[error("transport failure: {0}")]
    Transport(HttpError),

    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response had no body that can be read incrementally.
    #[error("streaming body unavailable: {0}")]
    StreamUnsupported(String),

    /// The caller fired the cancellation handle.
    #[error("request cancelled")]
    Cancelled,

    /// A JSON document the operation depends on could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<HttpError> for ChatError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => ChatError::Status {
                status,
                body: message,
            },
            HttpError::StreamUnsupported(message) => ChatError::StreamUnsupported(message),
            other => ChatError::Transport(other),
        }
    }
}

impl ChatError {
    /// Transport failures: network errors and non-success statuses.
    pub fn is_transport(&self) -> bool {
        matches!(self, ChatError::Transport(_) | ChatError::Status { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChatError::Cancelled)
    }

    /// HTTP status, when the backend sent one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// Nothing in this crate retries; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Transport(HttpError::ConnectionFailed(_))
            | ChatError::Transport(HttpError::Timeout(_))
            | ChatError::Transport(HttpError::Io(_)) => true,
            ChatError::Status { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            _ => false,
        }
    }

    /// A message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Transport(HttpError::Timeout(_)) => {
                "The request timed out. The server may be slow or unreachable.".to_string()
            }
            ChatError::Transport(_) => {
                "Unable to reach the server. Please check your internet connection.".to_string()
            }
            ChatError::Status { status, .. } => match *status {
                401 => "Authentication failed. Please check your API key.".to_string(),
                403 => "Access denied for this request.".to_string(),
                404 => "The requested endpoint was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            ChatError::StreamUnsupported(_) => {
                "The server response could not be streamed.".to_string()
            }
            ChatError::Cancelled => "The request was cancelled.".to_string(),
            ChatError::InvalidResponse(_) => {
                "Received an invalid response from the server.".to_string()
            }
            ChatError::Config(message) => format!("Configuration problem: {}", message),
        }
    }
}
