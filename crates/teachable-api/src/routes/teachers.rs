//! Teacher application routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde_json::json;
use teachable_db::{Collection, Document, Filter, InsertResult, UpdateResult};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireSelf;
use super::set_fields;
use super::types::{EmailQuery, TeacherStatus};

/// GET /teachers
async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let applications = state
        .db
        .find(Collection::Teachers, &Filter::new().eq_opt("email", query.email))
        .await?;
    Ok(Json(applications))
}

/// POST /teachers
async fn submit_application(
    State(state): State<AppState>,
    Json(application): Json<Document>,
) -> Result<Json<InsertResult>, ApiError> {
    let result = state.db.insert_one(Collection::Teachers, application).await?;
    info!("Received teacher application {}", result.inserted_id);
    Ok(Json(result))
}

/// GET /teachers/position/{email} (self only)
async fn teacher_position(
    RequireSelf(user): RequireSelf,
    State(state): State<AppState>,
) -> Result<Json<TeacherStatus>, ApiError> {
    let email = user.email.unwrap_or_default();
    let application = state.db.find_teacher_by_email(&email).await?;

    Ok(Json(TeacherStatus {
        teacher: application.is_some_and(|a| a.is_teacher()),
    }))
}

/// PATCH /teachers/approved/{id}
async fn approve_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state
        .db
        .update_one(
            Collection::Teachers,
            &id,
            set_fields(json!({"status": "approved", "position": "teacher"})),
            true,
        )
        .await?;
    info!("Approved teacher application {}", id);
    Ok(Json(result))
}

/// PATCH /teachers/reject/{id}
async fn reject_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state
        .db
        .update_one(Collection::Teachers, &id, set_fields(json!({"status": "Reject"})), true)
        .await?;
    info!("Rejected teacher application {}", id);
    Ok(Json(result))
}

/// Create teacher routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teachers", get(list_applications).post(submit_application))
        .route("/teachers/position/{email}", get(teacher_position))
        .route("/teachers/approved/{id}", patch(approve_application))
        .route("/teachers/reject/{id}", patch(reject_application))
}
