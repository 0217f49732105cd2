use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::auth::password::PasswordError;
use crate::schemas::ErrorResponse;

/// Error type shared by all API handlers.
///
/// Each variant maps to one HTTP status and one machine-readable code, so a
/// handler only ever describes what went wrong and the rendering stays in one
/// place.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Registration attempted with a username that is already taken
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Login rejected. Carries no hint of whether the username or the
    /// password was the wrong half.
    #[error("invalid credentials")]
    AuthFailure,

    /// The request carried no usable session token
    #[error("not authenticated")]
    NotAuthenticated,

    /// The caller is authenticated but does not own the target item
    #[error("forbidden")]
    Forbidden,

    /// The requested item does not exist
    #[error("item not found")]
    ItemNotFound,

    /// Error from password hashing
    #[error("password hash error: {0}")]
    Password(#[from] PasswordError),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DuplicateUsername(_) => StatusCode::CONFLICT,
            ApiError::AuthFailure => StatusCode::UNAUTHORIZED,
            ApiError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::ItemNotFound => StatusCode::NOT_FOUND,
            ApiError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the machine-readable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::DuplicateUsername(_) => "USERNAME_ALREADY_EXISTS",
            ApiError::AuthFailure => "AUTHENTICATION_FAILED",
            ApiError::NotAuthenticated => "NOT_AUTHENTICATED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::ItemNotFound => "ITEM_NOT_FOUND",
            ApiError::Password(_) => "PASSWORD_HASH_ERROR",
            ApiError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Message included in the response body. Internal failures are not
    /// echoed back to the client; the detail goes to the log instead.
    fn public_message(&self) -> String {
        match self {
            ApiError::DuplicateUsername(username) => {
                format!("Username '{}' is already taken", username)
            }
            ApiError::AuthFailure => "Invalid username or password".to_string(),
            ApiError::NotAuthenticated => "Authentication required".to_string(),
            ApiError::Forbidden => {
                "You do not have permission to access this item".to_string()
            }
            ApiError::ItemNotFound => "Item not found".to_string(),
            ApiError::Password(_) | ApiError::Database(_) => {
                "An internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(err) => error!("Database error while handling request: {}", err),
            ApiError::Password(err) => error!("Password hashing failed: {}", err),
            _ => {}
        }

        let body = ErrorResponse {
            error: self.public_message(),
            code: self.code().to_string(),
            success: false,
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::DuplicateUsername("alice".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::AuthFailure.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::NotAuthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::ItemNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Database(sea_orm::DbErr::Custom("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_code_mapping() {
        assert_eq!(
            ApiError::DuplicateUsername("alice".to_string()).code(),
            "USERNAME_ALREADY_EXISTS"
        );
        assert_eq!(ApiError::AuthFailure.code(), "AUTHENTICATION_FAILED");
        assert_eq!(ApiError::NotAuthenticated.code(), "NOT_AUTHENTICATED");
        assert_eq!(ApiError::Forbidden.code(), "FORBIDDEN");
        assert_eq!(ApiError::ItemNotFound.code(), "ITEM_NOT_FOUND");
    }

    #[test]
    fn test_auth_failure_message_has_no_detail() {
        // The same body must come back for an unknown username and a wrong
        // password, so the message can mention neither.
        let message = ApiError::AuthFailure.public_message();
        assert_eq!(message, "Invalid username or password");
    }

    #[test]
    fn test_internal_detail_not_echoed() {
        let err = ApiError::Database(sea_orm::DbErr::Custom("secret detail".to_string()));
        assert!(!err.public_message().contains("secret detail"));
    }
}
