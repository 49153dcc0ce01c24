use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::auth_service::AuthServiceError;
use crate::services::password_reset_service::PasswordResetError;
use crate::services::user_service::UserServiceError;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("An account with this email already exists.")]
    DuplicateEmail,

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Invalid or expired token.")]
    InvalidOrExpiredToken,

    #[error("Authentication required.")]
    Unauthorized,

    #[error("You don't have permission to access this resource.")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::DuplicateEmail
            | AppError::InvalidCredentials
            | AppError::InvalidOrExpiredToken => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

fn from_repository_error(err: crate::repositories::user_repository::RepositoryError) -> AppError {
    use crate::repositories::user_repository::RepositoryError;
    match err {
        RepositoryError::Database(e) => AppError::Database(e),
        other => AppError::Internal(other.to_string()),
    }
}

// Service errors collapse into the client-facing taxonomy here. Anything
// that could leak account or token state maps to the generic variants.
impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidEmail
            | UserServiceError::MissingName
            | UserServiceError::WeakPassword => AppError::Validation(err.to_string()),
            UserServiceError::EmailTaken => AppError::DuplicateEmail,
            UserServiceError::WrongPassword => AppError::InvalidCredentials,
            UserServiceError::UserNotFound => AppError::InvalidCredentials,
            UserServiceError::HashingError(e) => AppError::Internal(e.to_string()),
            UserServiceError::RepositoryError(e) => from_repository_error(e),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials | AuthServiceError::UserNotFound => {
                AppError::InvalidCredentials
            }
            AuthServiceError::RepositoryError(e) => from_repository_error(e),
        }
    }
}

impl From<PasswordResetError> for AppError {
    fn from(err: PasswordResetError) -> Self {
        match err {
            PasswordResetError::InvalidEmail | PasswordResetError::WeakPassword => {
                AppError::Validation(err.to_string())
            }
            PasswordResetError::InvalidToken => AppError::InvalidOrExpiredToken,
            PasswordResetError::HashingError(e) => AppError::Internal(e.to_string()),
            PasswordResetError::RepositoryError(e) => from_repository_error(e),
        }
    }
}
