use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Empty title/body/comment, caught before any remote call. Blocks the
    /// submission; never presented as a remote failure.
    Validation(String),
    /// A mutating action was attempted without an authenticated viewer.
    /// Raised before any remote call; distinct from remote failures.
    AuthRequired(String),
    /// A read against the remote gateway failed. Prior local state is kept.
    Fetch(String),
    /// A write against the remote gateway failed. No optimistic state for the
    /// failed action is applied.
    Create(String),
    /// An image rejected at the upload boundary (size/type), or the media
    /// store itself failed.
    Upload(String),
    NotFound(String),
    /// Opaque backend failure. Repositories convert this into `Fetch` or
    /// `Create` at their boundary.
    Gateway(anyhow::Error),
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::AuthRequired(msg) => write!(f, "Sign in required: {}", msg),
            AppError::Fetch(msg) => write!(f, "Fetch error: {}", msg),
            AppError::Create(msg) => write!(f, "Create error: {}", msg),
            AppError::Upload(msg) => write!(f, "Upload error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Gateway(err) => write!(f, "Gateway error: {}", err),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::AuthRequired(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Fetch(msg) => {
                tracing::error!("Fetch error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::Create(msg) => {
                tracing::error!("Create error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::Upload(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Gateway(err) => {
                tracing::error!("Gateway error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Gateway(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
