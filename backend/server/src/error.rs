use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use records::policy::PolicyViolation;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::config::ConfigError;

/// Failures that stop the server before or while it serves.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to initialize state: {0}")]
    State(#[from] AppError),

    #[error("Listener error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Policy(#[from] PolicyViolation),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] redis::RedisError),

    #[error("Corrupt document: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::Invalid(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn internal(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        AppError::InternalError(error.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload { .. } | AppError::Invalid { .. } | AppError::Policy { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Database { .. } | AppError::Corrupt { .. } | AppError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = if status.is_server_error() {
            error!("Request failed: {self}");

            json!({
                "status": "error",
                "message": "Something went wrong. Please try again.",
            })
        } else {
            json!({
                "status": "fail",
                "message": self.to_string(),
            })
        };

        (status, Json(body)).into_response()
    }
}
