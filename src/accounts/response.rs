use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use super::errors::AccountError;

pub const MSG_USER_REGISTERED: &str = "User registered successfully";
pub const MSG_USER_LOGGED_IN: &str = "User logged in successfully";
pub const MSG_PROFILE_RETRIEVED: &str = "User profile retrieved successfully";
pub const MSG_USER_LIST_RETRIEVED: &str = "User list retrieved successfully";
pub const MSG_USER_RETRIEVED: &str = "User retrieved successfully";
pub const MSG_USER_CREATED: &str = "User created successfully";
pub const MSG_USER_UPDATED: &str = "User updated successfully";
pub const MSG_USER_DELETED: &str = "User deleted successfully";

pub const MSG_USERNAME_REQUIRED: &str = "Username is required";
pub const MSG_NAME_REQUIRED: &str = "Name is required";
pub const MSG_EMAIL_REQUIRED: &str = "Email is required";
pub const MSG_PASSWORD_REQUIRED: &str = "Password is required";
pub const MSG_TOKEN_REQUIRED: &str = "Authentication token is required";
pub const MSG_INVALID_EMAIL: &str = "Invalid email format";
pub const MSG_INVALID_USERNAME: &str =
    "Username must be 3-30 characters and contain only letters, numbers, and underscores";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long";
pub const MSG_INVALID_ROLE_ID: &str = "Role ID must be a positive integer";
pub const MSG_INVALID_USER_ID: &str = "User ID must be a positive integer";
pub const MSG_NAME_TOO_LONG: &str = "Name must be at most 100 characters";
pub const MSG_EMAIL_TOO_LONG: &str = "Email must be at most 100 characters";
pub const MSG_PHONE_TOO_LONG: &str = "Phone must be at most 20 characters";
pub const MSG_MOBILE_TOO_LONG: &str = "Mobile must be at most 20 characters";
pub const MSG_IMAGE_URL_TOO_LONG: &str = "Image URL must be at most 255 characters";
pub const MSG_INVALID_REQUEST_BODY: &str = "Invalid request body";
pub const MSG_INVALID_QUERY: &str = "Invalid query parameters";
pub const MSG_USERNAME_EXISTS: &str = "Username already exists";
pub const MSG_EMAIL_EXISTS: &str = "Email address already exists";

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const MSG_INVALID_TOKEN: &str = "Invalid or expired token";

pub const MSG_USER_REGISTRATION_FAILED: &str = "Failed to register user";
pub const MSG_USER_LOGIN_FAILED: &str = "Failed to authenticate user";
pub const MSG_PROFILE_RETRIEVAL_FAILED: &str = "Failed to retrieve user profile";
pub const MSG_USER_LIST_FAILED: &str = "Failed to retrieve user list";
pub const MSG_USER_RETRIEVAL_FAILED: &str = "Failed to retrieve user";
pub const MSG_USER_NOT_FOUND: &str = "User not found";
pub const MSG_USER_CREATION_FAILED: &str = "Failed to create user";
pub const MSG_USER_UPDATE_FAILED: &str = "Failed to update user";
pub const MSG_USER_DELETION_FAILED: &str = "Failed to delete user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    Success,
    ValidationError,
    AuthenticationError,
    #[allow(dead_code)] // no role checks are enforced
    AuthorizationError,
    NotFound,
    AlreadyExists,
    InternalError,
}

impl ResponseCode {
    pub fn status(self) -> StatusCode {
        match self {
            ResponseCode::Success => StatusCode::OK,
            ResponseCode::ValidationError => StatusCode::BAD_REQUEST,
            ResponseCode::AuthenticationError => StatusCode::UNAUTHORIZED,
            ResponseCode::AuthorizationError => StatusCode::FORBIDDEN,
            ResponseCode::NotFound => StatusCode::NOT_FOUND,
            ResponseCode::AlreadyExists => StatusCode::CONFLICT,
            ResponseCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Envelope carrying only the outcome; used for delete and for every error.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub code: ResponseCode,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            code: ResponseCode::Success,
            message: message.into(),
        }
    }
}

/// Error surfaced to the caller: a response code plus a fixed message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ResponseCode,
    pub message: String,
}

impl ApiError {
    fn new(code: ResponseCode, message: &str) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: &str) -> Self {
        Self::new(ResponseCode::ValidationError, message)
    }

    pub fn authentication(message: &str) -> Self {
        Self::new(ResponseCode::AuthenticationError, message)
    }

    /// Maps a use-case failure. `internal_message` replaces the detail of
    /// internal errors, which is logged instead of returned.
    pub fn from_account(err: AccountError, internal_message: &str) -> Self {
        match err {
            AccountError::UsernameTaken => Self::new(ResponseCode::AlreadyExists, MSG_USERNAME_EXISTS),
            AccountError::EmailTaken => Self::new(ResponseCode::AlreadyExists, MSG_EMAIL_EXISTS),
            AccountError::NotFound => Self::new(ResponseCode::NotFound, MSG_USER_NOT_FOUND),
            AccountError::InvalidCredential => {
                Self::new(ResponseCode::AuthenticationError, MSG_INVALID_TOKEN)
            }
            AccountError::Internal(e) => {
                error!(error = %e, "{}", internal_message);
                Self::new(ResponseCode::InternalError, internal_message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = MessageResponse {
            success: false,
            code: self.code,
            message: self.message,
        };
        (self.code.status(), Json(body)).into_response()
    }
}
