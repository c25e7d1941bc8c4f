//! Assignment, submission and review routes

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use teachable_db::{Collection, Document, Filter, InsertResult};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::EmailQuery;

async fn list_in(
    state: &AppState,
    collection: Collection,
    filter: Filter,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.db.find(collection, &filter).await?))
}

async fn insert_into(
    state: &AppState,
    collection: Collection,
    document: Document,
) -> Result<Json<InsertResult>, ApiError> {
    let result = state.db.insert_one(collection, document).await?;
    info!("Inserted {} into {}", result.inserted_id, collection);
    Ok(Json(result))
}

/// GET /assignments
async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    list_in(&state, Collection::Assignments, Filter::new().eq_opt("email", query.email)).await
}

/// POST /assignments
async fn create_assignment(
    State(state): State<AppState>,
    Json(assignment): Json<Document>,
) -> Result<Json<InsertResult>, ApiError> {
    insert_into(&state, Collection::Assignments, assignment).await
}

/// GET /submit
async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    list_in(&state, Collection::Submissions, Filter::new().eq_opt("email", query.email)).await
}

/// POST /submit
async fn submit_assignment(
    State(state): State<AppState>,
    Json(submission): Json<Document>,
) -> Result<Json<InsertResult>, ApiError> {
    insert_into(&state, Collection::Submissions, submission).await
}

/// GET /review
async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    list_in(&state, Collection::Reviews, Filter::new()).await
}

/// POST /review
async fn create_review(
    State(state): State<AppState>,
    Json(review): Json<Document>,
) -> Result<Json<InsertResult>, ApiError> {
    insert_into(&state, Collection::Reviews, review).await
}

/// Create coursework routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assignments", get(list_assignments).post(create_assignment))
        .route("/submit", get(list_submissions).post(submit_assignment))
        .route("/review", get(list_reviews).post(create_review))
}
