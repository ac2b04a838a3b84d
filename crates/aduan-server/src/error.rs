//! Mapping of domain errors onto HTTP responses.
//!
//! Bodies are always `{"error": "<message>"}`. Server-side failures are
//! logged in full and answered with a generic message.

use aduan_core::error::AduanError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<AduanError> for ApiError {
    fn from(err: AduanError) -> Self {
        match err {
            AduanError::Validation { message } => Self::bad_request(message),
            AduanError::AuthenticationFailed { reason } => Self::unauthorized(reason),
            AduanError::AuthorizationDenied { reason } => Self::new(StatusCode::FORBIDDEN, reason),
            AduanError::NotFound { entity, .. } => {
                Self::new(StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            conflict @ AduanError::AlreadyExists { .. } => {
                Self::new(StatusCode::CONFLICT, conflict.to_string())
            }
            internal @ (AduanError::Database(_)
            | AduanError::Crypto(_)
            | AduanError::Notification(_)
            | AduanError::Internal(_)) => {
                error!(error = %internal, "Request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
