//! Payment intent routes

use axum::{Json, Router, extract::State, routing::post};
use teachable_payment::price_to_minor_units;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{ClientSecretResponse, PriceRequest};

const CURRENCY: &str = "usd";

/// POST /create-payment-intent
async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<PriceRequest>,
) -> Result<Json<ClientSecretResponse>, ApiError> {
    let amount = price_to_minor_units(request.price);
    debug!("Creating payment intent for {} ({} minor units)", request.price, amount);

    let intent = state.payments.create_payment_intent(amount, CURRENCY).await?;

    metrics::counter!("teachable_payment_intents_total").increment(1);

    Ok(Json(ClientSecretResponse {
        client_secret: intent.client_secret,
    }))
}

/// Create payment routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/create-payment-intent", post(create_payment_intent))
}
