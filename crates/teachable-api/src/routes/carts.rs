//! Cart (enrollment) routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use teachable_db::{Collection, DeleteResult, Document, Filter, InsertResult};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::EmailQuery;

/// GET /carts
///
/// Lists every cart item, or only the caller's when `?email=` is given.
async fn list_cart(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let items = state
        .db
        .find(Collection::Carts, &Filter::new().eq_opt("email", query.email))
        .await?;
    Ok(Json(items))
}

/// GET /carts/{id}
async fn get_cart_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    let item = state.db.find_by_id(Collection::Carts, &id).await?;
    Ok(Json(item))
}

/// POST /carts
async fn add_to_cart(
    State(state): State<AppState>,
    Json(item): Json<Document>,
) -> Result<Json<InsertResult>, ApiError> {
    let result = state.db.insert_one(Collection::Carts, item).await?;
    info!("Added cart item {}", result.inserted_id);
    Ok(Json(result))
}

/// DELETE /carts/{id}
async fn remove_from_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = state.db.delete_one(Collection::Carts, &id).await?;
    Ok(Json(result))
}

/// Create cart routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/carts", get(list_cart).post(add_to_cart))
        .route("/carts/{id}", get(get_cart_item).delete(remove_from_cart))
}
