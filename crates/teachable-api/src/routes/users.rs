//! User and role routes

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use serde_json::{Value, json};
use teachable_db::{Collection, DeleteResult, Document, Filter, UpdateResult};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::{RequireAdmin, RequireSelf};
use super::set_fields;
use super::types::{AdminStatus, CreateUserResponse};

/// GET /users (Admin only)
async fn list_users(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let users = state.db.find(Collection::Users, &Filter::new()).await?;
    Ok(Json(users))
}

/// POST /users
///
/// Registers the user unless a record with the same email already exists.
async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<Document>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    if let Some(email) = user.get("email").and_then(Value::as_str)
        && state.db.find_user_by_email(email).await?.is_some()
    {
        debug!("User {} already exists", email);
        return Ok(Json(CreateUserResponse::Exists {
            message: "User already exists".to_string(),
            inserted_id: None,
        }));
    }

    let result = state.db.insert_one(Collection::Users, user).await?;
    info!("Created user {}", result.inserted_id);
    Ok(Json(CreateUserResponse::Inserted(result)))
}

/// GET /users/admin/{email} (self only)
async fn admin_status(
    RequireSelf(user): RequireSelf,
    State(state): State<AppState>,
) -> Result<Json<AdminStatus>, ApiError> {
    let email = user.email.unwrap_or_default();
    let record = state.db.find_user_by_email(&email).await?;

    Ok(Json(AdminStatus {
        admin: record.is_some_and(|r| r.is_admin()),
    }))
}

/// PATCH /users/admin/{id}
///
/// Shares its path pattern with the admin status query; here the segment is
/// a user id.
async fn make_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state
        .db
        .update_one(Collection::Users, &id, set_fields(json!({"role": "admin"})), false)
        .await?;
    info!("Granted admin role to user {}", id);
    Ok(Json(result))
}

/// DELETE /users/{id} (Admin only)
async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = state.db.delete_one(Collection::Users, &id).await?;
    info!(
        "User {} deleted by {} ({} removed)",
        id,
        admin.email.as_deref().unwrap_or_default(),
        result.deleted_count
    );
    Ok(Json(result))
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", delete(delete_user))
        .route("/users/admin/{email}", get(admin_status).patch(make_admin))
}
