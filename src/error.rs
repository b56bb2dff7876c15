use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ErrorMessage {
    EmptyPassword,
    ExceededMaxPasswordLength(usize),
    HashingError,
    InvalidHashFormat,
    InvalidToken,
    TokenNotProvided,
    WrongCredentials,
    UserExist,
    UserNoLongerExist,
    UserNotAuthenticated,
    PermissionDenied,
    VipRequired,
}

impl ToString for ErrorMessage {
    fn to_string(&self) -> String {
        self.to_str().to_owned()
    }
}

impl ErrorMessage {
    fn to_str(&self) -> String {
        match self {
            ErrorMessage::EmptyPassword => "Password cannot be empty".to_string(),
            ErrorMessage::ExceededMaxPasswordLength(max_length) => {
                format!("Password must not be more than {} characters", max_length)
            }
            ErrorMessage::HashingError => "Error while hashing password".to_string(),
            ErrorMessage::InvalidHashFormat => "Invalid password hash format".to_string(),
            ErrorMessage::InvalidToken => "Invalid token".to_string(),
            ErrorMessage::TokenNotProvided => "Access token required".to_string(),
            ErrorMessage::WrongCredentials => "Invalid credentials".to_string(),
            ErrorMessage::UserExist => "User already exists".to_string(),
            ErrorMessage::UserNoLongerExist => {
                "User belonging to this token no longer exists".to_string()
            }
            ErrorMessage::UserNotAuthenticated => "Authentication required".to_string(),
            ErrorMessage::PermissionDenied => "Admin access required".to_string(),
            ErrorMessage::VipRequired => "VIP access required".to_string(),
        }
    }
}

/// Uniform error envelope returned to callers: `{"error": "<message>"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct HttpError {
    pub message: String,
    pub status: StatusCode,
}

impl HttpError {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        HttpError {
            message: message.into(),
            status,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::BAD_REQUEST)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::UNAUTHORIZED)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::FORBIDDEN)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::NOT_FOUND)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::BAD_GATEWAY)
    }

    pub fn into_http_response(self) -> axum::response::Response {
        // Internal details never reach the caller in production; the full
        // message still lands in the logs.
        let message = if self.status.is_server_error() {
            tracing::error!("request failed with {}: {}", self.status, self.message);
            if crate::config::is_production() {
                "Internal server error".to_string()
            } else {
                self.message
            }
        } else {
            self.message
        };

        (self.status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HttpError: message: {}, status: {}", self.message, self.status)
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        self.into_http_response()
    }
}
