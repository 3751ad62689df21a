// Service-level error handling
// Every operation surfaces one of these; the HTTP layer recovers all of
// them into a status code plus a JSON error envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use thiserror::Error;

use crate::utils::password::PasswordError;

/// Errors produced by the identity, payment, and reward services
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Reward already claimed for this video")]
    AlreadyRewarded,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Standard error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub description: String,
}

impl ServiceError {
    /// Convert to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::DuplicateEmail => StatusCode::CONFLICT,
            ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ServiceError::AlreadyRewarded => StatusCode::BAD_REQUEST,
            ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Database(_)
            | ServiceError::Pool(_)
            | ServiceError::Hashing(_)
            | ServiceError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::DuplicateEmail => "DUPLICATE_EMAIL",
            ServiceError::InvalidCredentials => "INVALID_CREDENTIALS",
            ServiceError::AlreadyRewarded => "ALREADY_REWARDED",
            ServiceError::Unauthenticated => "UNAUTHENTICATED",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Database(_) => "DATABASE_ERROR",
            ServiceError::Pool(_) => "POOL_ERROR",
            ServiceError::Hashing(_) => "HASHING_ERROR",
            ServiceError::Token(_) => "TOKEN_ERROR",
        }
    }

    /// Message safe to show to a client; internal details stay in logs
    fn public_message(&self) -> String {
        match self {
            ServiceError::Database(_)
            | ServiceError::Pool(_)
            | ServiceError::Hashing(_)
            | ServiceError::Token(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error_code = self.error_code(), "Request failed: {}", self);
        }

        let message = self.public_message();
        let response = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: self.error_code().to_string(),
                description: message.clone(),
            },
            message,
        };

        (status, Json(response)).into_response()
    }
}
