//! Axum-specific error types and mappings.
//!
//! Every failure leaves the gateway as `{"detail": ..., "error_code": ...}`.

use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use geneticllm_core::{AuthError, InferenceError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Scheme advertised in `WWW-Authenticate` on 401 responses.
pub const AUTH_SCHEME: &str = "ApiKey";

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Access gate rejected the request.
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// Request body failed to parse or is out of bounds.
    #[error("{0}")]
    Validation(String),

    /// Upstream inference failed.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable discriminant.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(AuthError::MissingCredential) => "missing_api_key",
            Self::Unauthorized(AuthError::InvalidCredential) => "invalid_api_key",
            Self::Validation(_) => "validation_error",
            Self::Inference(_) => "inference_error",
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.to_string(),
            error_code: Some(self.error_code()),
        };

        let mut response = (status, axum::Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(AUTH_SCHEME),
            );
        }
        response
    }
}

impl From<ValidationError> for HttpError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}
