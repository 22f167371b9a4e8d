//! Inference adapter error type.

use thiserror::Error;

use crate::transport::TransportError;

/// Any downstream failure while producing a reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// Upstream answered with a non-success status.
    #[error("HuggingFace API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Upstream did not answer within the configured bound.
    #[error("Request timed out. The model may be loading - please try again.")]
    Timeout,

    /// Upstream answered 2xx with a body of the wrong shape.
    #[error("Unexpected response from model endpoint: {0}")]
    MalformedReply(String),

    /// Reply text was empty after normalization.
    #[error("Model returned empty response.")]
    EmptyResponse,

    /// Request could not be built or sent.
    #[error("Failed to reach model endpoint: {0}")]
    Transport(String),
}

impl From<TransportError> for InferenceError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(_) => Self::Timeout,
            TransportError::Request(msg) => Self::Transport(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_upstream_error_message() {
        let err = InferenceError::Upstream {
            status: 429,
            message: "rate limited".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn test_timeout_suggests_cold_start() {
        let err: InferenceError = TransportError::Timeout(Duration::from_secs(180)).into();
        assert_eq!(err, InferenceError::Timeout);
        assert!(err.to_string().contains("timed out"));
        assert!(err.to_string().contains("loading"));
    }

    #[test]
    fn test_request_failure_maps_to_transport() {
        let err: InferenceError = TransportError::Request("dns error".into()).into();
        assert_eq!(err, InferenceError::Transport("dns error".into()));
    }
}
