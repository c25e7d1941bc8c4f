//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

const GENERIC_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] teachable_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] teachable_auth::AuthError),

    #[error("Payment error: {0}")]
    Payment(#[from] teachable_payment::PaymentError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Gate rejections carry their own generic bodies
            ApiError::Auth(e) => return e.into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            // Store and provider details stay in the log
            ApiError::Database(e) => {
                error!("Database operation failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_MESSAGE.to_string())
            }
            ApiError::Payment(e) => {
                error!("Payment provider call failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_MESSAGE.to_string())
            }
        };

        let body = axum::Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teachable_auth::AuthError;
    use teachable_payment::PaymentError;

    async fn message_of(error: ApiError) -> serde_json::Value {
        let bytes = axum::body::to_bytes(error.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice::<serde_json::Value>(&bytes).unwrap()["message"].clone()
    }

    #[tokio::test]
    async fn test_internal_details_are_not_sent() {
        let upstream = PaymentError::Upstream {
            status: 402,
            message: "card_declined: sk_live_secret".to_string(),
        };
        assert_eq!(message_of(ApiError::from(upstream)).await, json!("Internal server error"));

        let invalid = teachable_db::DbError::InvalidDocument("bad field".to_string());
        assert_eq!(message_of(ApiError::from(invalid)).await, json!("Internal server error"));

        assert_eq!(
            message_of(ApiError::Internal("Failed to update class".to_string())).await,
            json!("Failed to update class")
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(AuthError::MissingAuthHeader).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::InsufficientPermissions).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(PaymentError::NotConfigured).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal("boom".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
