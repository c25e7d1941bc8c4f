//! Course listing routes

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use serde_json::json;
use teachable_db::{Collection, DeleteResult, Document, Filter, InsertResult, UpdateResult};
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::set_fields;

/// GET /classes
async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let classes = state.db.find(Collection::Classes, &Filter::new()).await?;
    Ok(Json(classes))
}

/// GET /classes/{id}
async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    let class = state.db.find_by_id(Collection::Classes, &id).await?;
    Ok(Json(class))
}

/// GET /class/{email}
async fn list_classes_by_instructor(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let classes = state
        .db
        .find(Collection::Classes, &Filter::new().eq("email", email))
        .await?;
    Ok(Json(classes))
}

/// POST /classes
async fn create_class(
    State(state): State<AppState>,
    Json(class): Json<Document>,
) -> Result<Json<InsertResult>, ApiError> {
    let result = state.db.insert_one(Collection::Classes, class).await?;
    info!("Created class {}", result.inserted_id);
    Ok(Json(result))
}

/// PATCH /classes/approve/{id}
async fn approve_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state
        .db
        .update_one(Collection::Classes, &id, set_fields(json!({"status": "approve"})), false)
        .await?;
    info!("Approved class {}", id);
    Ok(Json(result))
}

/// PATCH /classes/rejected/{id}
async fn reject_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state
        .db
        .update_one(Collection::Classes, &id, set_fields(json!({"status": "rejected"})), false)
        .await?;
    info!("Rejected class {}", id);
    Ok(Json(result))
}

/// PATCH /classes/{id}
async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<Document>,
) -> Result<Json<UpdateResult>, ApiError> {
    debug!("Updating class {}", id);

    let result = state
        .db
        .update_one(Collection::Classes, &id, fields, true)
        .await
        .map_err(|e| {
            error!("Failed to update class {}: {}", id, e);
            ApiError::Internal("Failed to update class".to_string())
        })?;
    Ok(Json(result))
}

/// DELETE /classes/{id}
async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = state.db.delete_one(Collection::Classes, &id).await?;
    info!("Deleted class {} ({} removed)", id, result.deleted_count);
    Ok(Json(result))
}

/// Create class routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes).post(create_class))
        .route(
            "/classes/{id}",
            get(get_class).patch(update_class).delete(delete_class),
        )
        .route("/classes/approve/{id}", patch(approve_class))
        .route("/classes/rejected/{id}", patch(reject_class))
        .route("/class/{email}", get(list_classes_by_instructor))
}
