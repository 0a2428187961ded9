//! Error handling - every failure is rendered as the standard envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use scribe_core::error::{DomainError, RepoError};
use scribe_core::ports::AuthError;
use scribe_shared::{Envelope, FieldErrors};

pub const NOT_FOUND_MESSAGE: &str = "Data Not found";
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated.";
pub const SERVER_ERROR_MESSAGE: &str = "Something went wrong";

/// Application-level error type.
///
/// The `Display` text is for logs. Clients only ever see the fixed messages
/// above, the field errors of a 422, or the message of a 4xx carrying one.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthenticated")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound => Envelope::message(NOT_FOUND_MESSAGE),
            AppError::BadRequest(msg) | AppError::Conflict(msg) => Envelope::message(msg.clone()),
            AppError::Unauthorized => Envelope::message(UNAUTHENTICATED_MESSAGE),
            AppError::InvalidCredentials => {
                Envelope::message("These credentials do not match our records.")
            }
            AppError::Validation(errors) => Envelope::validation(errors.clone()),
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                Envelope::message(SERVER_ERROR_MESSAGE)
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => AppError::NotFound,
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Repository(e) => e.into(),
            e @ (DomainError::Storage(_) | DomainError::Internal(_)) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound,
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            e @ (RepoError::Connection(_) | RepoError::Query(_)) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Missing | AuthError::Expired | AuthError::Rejected(_) => {
                AppError::Unauthorized
            }
            e @ AuthError::Hashing(_) => AppError::Internal(e.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
