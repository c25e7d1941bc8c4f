//! Teachable Class REST API
//!
//! This crate provides the Axum-based HTTP API: the access gate extractors,
//! the collection routes, credential issuance and payment-intent creation.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
