//! API routes

pub mod auth;
mod carts;
mod classes;
mod coursework;
mod health;
pub mod metrics;
mod payments;
mod teachers;
pub mod types;
mod users;


use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use teachable_db::Document;

use crate::state::{AppState, MetricsHandle};

pub use auth::{RequireAdmin, RequireAuth, RequireSelf};

/// Build a `$set` document from literal fields
fn set_fields(fields: Value) -> Document {
    match fields {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(classes::routes())
        .merge(teachers::routes())
        .merge(users::routes())
        .merge(carts::routes())
        .merge(coursework::routes())
        .merge(payments::routes())
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}
