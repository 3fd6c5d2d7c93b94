//! Domain-to-HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": "<short human message>"}` with
//! the status the error taxonomy prescribes. Storage details never reach the
//! client; they are logged here and replaced with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use domains::DomainError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let (status, message) = match err {
            DomainError::NotFound(entity, _) => {
                (StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            DomainError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            DomainError::Locked(_) => (StatusCode::FORBIDDEN, "Topic is locked".to_string()),
            DomainError::Storage(detail) => {
                error!(detail = %detail, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
