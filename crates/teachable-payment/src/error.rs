//! Payment error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Payment provider returned error: {status} - {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Payment provider is not configured")]
    NotConfigured,
}
