//! SEA-LION client error types.
//!
//! All errors implement `std::error::Error` via `thiserror`. The fallback
//! sequencer uses [`ClientError::is_retryable`] to decide whether to move on
//! to the next candidate model or abort the call.

use thiserror::Error;

/// Errors that can occur while talking to the SEA-LION API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key was configured; raised before any network call.
    #[error("SEA-LION API key is not configured (set SEALION_API_KEY)")]
    MissingApiKey,

    /// The request failed local validation.
    #[error("invalid request: {reason}")]
    InvalidRequest {
        reason: String,
    },

    /// HTTP 429. Never retried against another model.
    #[error("rate limited by SEA-LION API (model {model}): {body}")]
    RateLimited {
        model: String,
        body: String,
    },

    /// HTTP 5xx from the endpoint.
    #[error("server error {status} from model {model}: {body}")]
    ServerError {
        model: String,
        status: u16,
        body: String,
    },

    /// Any other non-2xx response (auth failures, bad requests, ...).
    #[error("API error {status} from model {model}: {body}")]
    ApiError {
        model: String,
        status: u16,
        body: String,
    },

    /// The model answered with an empty or whitespace-only reply.
    #[error("empty response from model {model}")]
    EmptyResponse {
        model: String,
    },

    /// TCP/HTTP connection to the endpoint failed.
    #[error("connection failed to {endpoint}: {reason}")]
    ConnectionFailed {
        endpoint: String,
        reason: String,
    },

    /// The endpoint did not respond within the configured timeout.
    #[error("request to {endpoint} timed out")]
    Timeout {
        endpoint: String,
    },

    /// A JSON body that could not be decoded.
    #[error("malformed response from model {model}: {reason}")]
    MalformedResponse {
        model: String,
        reason: String,
    },

    /// Every candidate model failed without recording a specific error.
    #[error("all models unavailable (tried: {})", attempted.join(", "))]
    AllModelsUnavailable {
        attempted: Vec<String>,
    },

    /// Configuration loading or validation error.
    #[error("config error: {reason}")]
    ConfigError {
        reason: String,
    },
}

impl ClientError {
    /// Whether this error should advance the sequencer to the next candidate.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::ServerError { .. }
                | ClientError::EmptyResponse { .. }
                | ClientError::ConnectionFailed { .. }
                | ClientError::Timeout { .. }
                | ClientError::MalformedResponse { .. }
        )
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RateLimited { .. } => Some(429),
            ClientError::ServerError { status, .. } | ClientError::ApiError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Map a `reqwest` transport failure onto the client taxonomy.
    pub(crate) fn from_transport(endpoint: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            ClientError::ConnectionFailed {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        }
    }
}
