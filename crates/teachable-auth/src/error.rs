//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Token signing secret is not configured")]
    MissingSecret,

    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// HTTP status for this rejection
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::MissingSecret | AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_header",
            AuthError::InvalidAuthHeader => "invalid_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenExpired => "expired_token",
            AuthError::InsufficientPermissions => "forbidden",
            AuthError::MissingSecret => "missing_secret",
            AuthError::Signing(_) => "signing",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Clients only learn the class of failure, never the cause
        let status = self.status();
        let message = match status {
            StatusCode::UNAUTHORIZED => "unauthorized access",
            StatusCode::FORBIDDEN => "forbidden access",
            _ => "Internal error",
        };

        let body = axum::Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}
