//! Prometheus scrape endpoint
//!
//! Mounted only when the binary has installed a recorder.

use axum::{Router, extract::State, http::header, response::IntoResponse, routing::get};
use std::sync::Arc;

use crate::state::MetricsHandle;

/// Prometheus text exposition format
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics
async fn scrape(State(handle): State<Arc<MetricsHandle>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], handle.render())
}

/// Scrape route bound to the recorder's handle
pub fn routes(handle: Arc<MetricsHandle>) -> Router {
    Router::new().route("/metrics", get(scrape)).with_state(handle)
}
