use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::now_stamp;
use crate::validate::FieldErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Validation Error")]
    Validation(FieldErrors),

    #[error("Database error")]
    Db(#[from] sqlx::Error),

    #[error("Session error")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Single-field validation failure, e.g. `{"status": "Invalid status"}`.
    pub fn validation_field(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), message.to_string());
        AppError::Validation(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Db(_) | AppError::Session(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Error kinds are mapped to a status and an envelope exactly once, here.
// Internal failures are logged with their cause and answered with a generic
// message; the details never reach the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(errors) => serde_json::json!({
                "success": false,
                "message": "Validation Error",
                "errors": errors,
                "timestamp": now_stamp(),
            }),
            AppError::Unauthorized(message) => serde_json::json!({
                "success": false,
                "message": message,
                "timestamp": now_stamp(),
            }),
            AppError::Db(err) => {
                tracing::error!(error = %err, "database error");
                redacted_body()
            }
            AppError::Session(err) => {
                tracing::error!(error = %err, "session store error");
                redacted_body()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                redacted_body()
            }
            other => serde_json::json!({
                "success": false,
                "message": other.to_string(),
                "data": serde_json::Value::Null,
                "timestamp": now_stamp(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

fn redacted_body() -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "message": "Internal Server Error",
        "data": serde_json::Value::Null,
        "timestamp": now_stamp(),
    })
}

pub type AppResult<T> = Result<T, AppError>;
