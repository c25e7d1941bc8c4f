//! Application state

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use teachable_auth::JwtManager;
use teachable_db::Database;
use teachable_payment::PaymentProvider;

/// Handle used to render the Prometheus scrape output
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub payments: Arc<dyn PaymentProvider>,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>, payments: Arc<dyn PaymentProvider>) -> Self {
        Self { db, jwt, payments }
    }
}
