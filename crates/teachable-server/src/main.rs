//! Teachable Class - course marketplace backend

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LoggingConfig};
use teachable_api::{AppState, create_router};
use teachable_auth::JwtManager;
use teachable_db::Database;
use teachable_payment::{StripeClient, StripeClientConfig};

/// Teachable Class - course marketplace backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "TEACHABLE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    init_logging(&config.logging);

    info!("Starting Teachable Class v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args, config).await {
        error!("Server failed: {:#}", e);
        return Err(e);
    }

    info!("Server stopped");
    Ok(())
}

async fn run(args: Args, config: Config) -> Result<()> {
    // Credentials cannot be issued without a secret
    let jwt = Arc::new(
        JwtManager::new(&config.auth.token_secret)
            .context("ACCESS_TOKEN_SECRET (auth.token_secret) must be set")?,
    );

    if let Some(parent) = Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_url).await?;

    let payments = Arc::new(StripeClient::new(StripeClientConfig {
        api_base: config.payment.api_base.clone(),
        secret_key: config.payment.secret_key.clone(),
    })?);

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")?;

    let state = AppState::new(db, jwt, payments);

    let app = create_router(state, Some(Arc::new(metrics_handle)))
        .layer(cors_layer(&config.cors.allowed_origins)?)
        .layer(TraceLayer::new_for_http());

    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);
    info!("Allowed origins: {}", config.cors.allowed_origins.join(", "));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the CORS policy for the configured browser origins
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {}", o))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_configured_origins() {
        let origins = vec![
            "http://localhost:5173".to_string(),
            "https://teachable-class.netlify.app".to_string(),
        ];
        assert!(cors_layer(&origins).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let origins = vec!["http://bad\norigin".to_string()];
        assert!(cors_layer(&origins).is_err());
    }
}
