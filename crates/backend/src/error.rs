// =============================================================================
// Atelier Backend - Error Types
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing authorization header")]
    MissingCredential,

    #[error("Invalid token")]
    InvalidCredential,

    #[error("Token expired")]
    TokenExpired,

    #[error("Scene not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match &self {
            AppError::MissingCredential => {
                (StatusCode::UNAUTHORIZED, "Missing authorization header".into())
            }
            AppError::InvalidCredential => (StatusCode::FORBIDDEN, "Invalid token".into()),
            AppError::TokenExpired => (StatusCode::FORBIDDEN, "Token expired".into()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Scene not found".into()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".into())
            }
            AppError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
