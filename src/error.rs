use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error taxonomy. Every failure leaving the HTTP boundary is one of
/// these four classes; backend internals are logged, never returned.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed, missing or out-of-range input (400).
    #[error("{message}")]
    Validation {
        error: &'static str,
        message: String,
        code: &'static str,
    },

    /// Unknown record id (404).
    #[error("{message}")]
    NotFound {
        error: &'static str,
        message: String,
        code: &'static str,
    },

    /// Missing bearer token (401).
    #[error("{message}")]
    Unauthorized {
        error: &'static str,
        message: String,
        code: &'static str,
    },

    /// Invalid or expired bearer token (403).
    #[error("{message}")]
    Forbidden {
        error: &'static str,
        message: String,
        code: &'static str,
    },

    /// A dependency (store, auth upstream) failed (500). Carries only a
    /// generic user-facing message.
    #[error("{message}")]
    Upstream {
        error: &'static str,
        message: String,
        code: &'static str,
    },
}

impl ApiError {
    pub fn validation(error: &'static str, message: impl Into<String>, code: &'static str) -> Self {
        ApiError::Validation {
            error,
            message: message.into(),
            code,
        }
    }

    pub fn not_found(error: &'static str, message: impl Into<String>, code: &'static str) -> Self {
        ApiError::NotFound {
            error,
            message: message.into(),
            code,
        }
    }

    pub fn unauthorized(error: &'static str, code: &'static str) -> Self {
        ApiError::Unauthorized {
            error,
            message: error.to_string(),
            code,
        }
    }

    pub fn forbidden(error: &'static str, code: &'static str) -> Self {
        ApiError::Forbidden {
            error,
            message: error.to_string(),
            code,
        }
    }

    pub fn upstream(error: &'static str, message: impl Into<String>, code: &'static str) -> Self {
        ApiError::Upstream {
            error,
            message: message.into(),
            code,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Unauthorized { code, .. }
            | ApiError::Forbidden { code, .. }
            | ApiError::Upstream { code, .. } => code,
        }
    }

    fn parts(&self) -> (&'static str, &str, &'static str) {
        match self {
            ApiError::Validation {
                error,
                message,
                code,
            }
            | ApiError::NotFound {
                error,
                message,
                code,
            }
            | ApiError::Unauthorized {
                error,
                message,
                code,
            }
            | ApiError::Forbidden {
                error,
                message,
                code,
            }
            | ApiError::Upstream {
                error,
                message,
                code,
            } => (error, message, code),
        }
    }
}

/// JSON error envelope: `{error, message, code}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message, code) = self.parts();
        let body = ErrorBody {
            error,
            message: message.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}
