//! Access gate extractors and credential issuance
//!
//! A handler states what the gate must prove by the extractor it takes:
//! nothing, [`RequireAuth`], [`RequireSelf`] or [`RequireAdmin`].

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, Path, State},
    http::request::Parts,
    routing::post,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use teachable_auth::{AuthError, AuthUser, authenticate, ensure_role, ensure_self_match};
use teachable_db::ADMIN_ROLE;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::TokenResponse;

/// Path parameter compared by the self-match stage
const SUBJECT_PARAM: &str = "email";

fn record_rejection(e: &AuthError) {
    metrics::counter!("teachable_auth_rejections_total", "reason" => e.reason()).increment(1);
}

// ==================== Auth Extractors ====================

/// Extractor for an authenticated caller
pub struct RequireAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let user = authenticate(&parts.headers, &app_state.jwt).inspect_err(record_rejection)?;

        Ok(RequireAuth(user))
    }
}

/// Extractor for an authenticated caller asking about themselves.
///
/// The `{email}` path segment must equal the credential's email claim.
pub struct RequireSelf(pub AuthUser);

impl<S> FromRequestParts<S> for RequireSelf
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthError::InsufficientPermissions)?;
        let subject = params
            .get(SUBJECT_PARAM)
            .ok_or(AuthError::InsufficientPermissions)?;

        ensure_self_match(subject, &user).inspect_err(record_rejection)?;

        Ok(RequireSelf(user))
    }
}

/// Extractor for an admin caller.
///
/// The role is read from the store on every request.
pub struct RequireAdmin(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let record = match user.email.as_deref() {
            Some(email) => app_state.db.find_user_by_email(email).await?,
            None => None,
        };

        ensure_role(
            record.as_ref().and_then(|r| r.role.as_deref()),
            ADMIN_ROLE,
        )
        .inspect_err(record_rejection)?;

        debug!("Admin access granted: {}", user.email.as_deref().unwrap_or_default());
        Ok(RequireAdmin(user))
    }
}

// ==================== Auth Routes ====================

/// POST /jwt
async fn issue_token(
    State(state): State<AppState>,
    Json(identity): Json<Map<String, Value>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = identity
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or("<no email>")
        .to_string();

    let token = state.jwt.generate_token(identity)?;

    metrics::counter!("teachable_tokens_issued_total").increment(1);
    info!("Issued credential for {}", email);

    Ok(Json(TokenResponse { token }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/jwt", post(issue_token))
}
