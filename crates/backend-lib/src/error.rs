// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use std::sync::OnceLock;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::validation::ValidationError;

/// Whether 500 responses carry the underlying error text. Set once at startup.
static EXPOSE_DETAILS: OnceLock<bool> = OnceLock::new();

/// Configure 500-response detail for the lifetime of the process.
/// Later calls are ignored.
pub fn expose_error_details(expose: bool) {
    let _ = EXPOSE_DETAILS.set(expose);
}

/// Application error types with error codes
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error("Access token required")]
    MissingCredential,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Too many failed login attempts, please try again later")]
    AuthRateLimited,

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Shorthand for a [`ValidationError::Invalid`]
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::Validation(ValidationError::Invalid(msg.into()))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::MissingCredential | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            },
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::AuthRateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::Conflict(_) => "CONFLICT_001",
            AppError::MissingCredential => "AUTH_001",
            AppError::InvalidCredentials => "AUTH_002",
            AppError::InvalidToken => "AUTH_003",
            AppError::AuthRateLimited => "AUTH_004",
            AppError::NotFound(_) => "NF_001",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
            AppError::Database(_) => "DB_001",
            AppError::Token(_) => "TOKEN_001",
        }
    }

    /// Message shown to the client
    pub fn client_message(&self) -> String {
        if self.status_code().is_server_error() && !EXPOSE_DETAILS.get().copied().unwrap_or(false) {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }

        let body = serde_json::json!({
            "error": self.client_message(),
            "code": self.error_code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::invalid(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::invalid(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("background task failed: {err}"))
    }
}
