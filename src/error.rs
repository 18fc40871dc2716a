//! Error types for image generation and editing.

use serde::Deserialize;

/// Maximum length of an API error message carried in an error.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Errors that can occur while generating or editing an image.
#[derive(Debug, thiserror::Error)]
pub enum ReelMindError {
    /// The response carried no candidates at all.
    #[error("no candidates in response{}", block_suffix(.block_reason))]
    NoCandidates {
        /// Prompt-level block reason, when the API reported one.
        block_reason: Option<String>,
    },

    /// The first candidate was stopped by the safety filter.
    #[error("content blocked by safety filter: {0}")]
    SafetyBlocked(String),

    /// The model answered with text instead of an image.
    #[error("model returned text instead of an image: {0}")]
    UnexpectedTextResponse(String),

    /// The candidate contained neither image data nor text.
    #[error("no image data found in response")]
    NoImageData,

    /// API key missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to decode base64 or a data URI.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., reading a source image or saving a result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request is already in flight.
    #[error("a request is already in progress")]
    Busy,
}

/// Coarse classification of [`ReelMindError`], in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Zero candidates.
    NoCandidates,
    /// Safety finish reason on the first candidate.
    SafetyBlocked,
    /// Text parts but no image part.
    UnexpectedTextResponse,
    /// Neither image nor text parts.
    NoImageData,
    /// Any failure raised by the network call itself.
    Transport,
    /// Failures raised locally before or after the call.
    Local,
}

impl ReelMindError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoCandidates { .. } => ErrorKind::NoCandidates,
            Self::SafetyBlocked(_) => ErrorKind::SafetyBlocked,
            Self::UnexpectedTextResponse(_) => ErrorKind::UnexpectedTextResponse,
            Self::NoImageData => ErrorKind::NoImageData,
            Self::Auth(_) | Self::Api { .. } | Self::Network(_) | Self::Json(_) => {
                ErrorKind::Transport
            }
            Self::InvalidRequest(_) | Self::Decode(_) | Self::Io(_) | Self::Busy => {
                ErrorKind::Local
            }
        }
    }

    /// Returns true if the network call itself failed.
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

fn block_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(" (prompt blocked: {r})"))
        .unwrap_or_default()
}

/// Result type alias for ReelMind operations.
pub type Result<T> = std::result::Result<T, ReelMindError>;

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Reduces an API error body to a short human-readable message.
///
/// Google error bodies look like `{"error":{"code":400,"message":"...","status":"..."}}`;
/// anything else is passed through trimmed.
pub(crate) fn api_error_message(body: &str) -> String {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if message.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = message.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{truncated}...")
    } else {
        message
    }
}
