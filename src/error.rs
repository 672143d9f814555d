//! Error types for Pawtrack server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric error codes returned to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchData = 4,
    InvalidState = 5,
    PetUnavailable = 6,
    DuplicateActiveRequest = 7,
    DateOutOfWindow = 8,
    WindowNotActive = 9,
    BadValue = 10,
    Unauthenticated = 11,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Pet {0} is not available for adoption")]
    PetUnavailable(i32),

    #[error("An active request already exists for pet {pet_id}")]
    DuplicateActiveRequest { pet_id: i32 },

    #[error("Date {date} is outside the follow-up window {start}..{end}")]
    DateOutOfWindow {
        date: chrono::NaiveDate,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Follow-up window of adoption {0} is not active")]
    WindowNotActive(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Convenience constructor for illegal state-machine moves
    pub fn invalid_transition(entity: &str, from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        AppError::InvalidState(format!("{} cannot move from '{}' to '{}'", entity, from, to))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join(", "))
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthenticated),
            AppError::NotAuthorized(_) => (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::InvalidState(_) => (StatusCode::CONFLICT, ErrorCode::InvalidState),
            AppError::PetUnavailable(_) => (StatusCode::CONFLICT, ErrorCode::PetUnavailable),
            AppError::DuplicateActiveRequest { .. } => {
                (StatusCode::CONFLICT, ErrorCode::DuplicateActiveRequest)
            }
            AppError::DateOutOfWindow { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::DateOutOfWindow)
            }
            AppError::WindowNotActive(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::WindowNotActive)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure)
            }
        };

        let message = match &self {
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
