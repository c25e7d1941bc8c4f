//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Credential signing secret; startup fails when empty
    #[serde(default)]
    pub token_secret: String,
}

/// Payment provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_payment_api_base")]
    pub api_base: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            api_base: default_payment_api_base(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: "pretty".to_string(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_db_path() -> String {
    "./data/teachable.db".to_string()
}

fn default_payment_api_base() -> String {
    teachable_payment::DEFAULT_API_BASE.to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "https://teachable-class.netlify.app".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a file, then apply environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Override secrets and deployment settings from the environment
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = lookup("ACCESS_TOKEN_SECRET") {
            self.auth.token_secret = secret;
        }
        if let Some(key) = lookup("PAYMENT_SECRET_KEY") {
            self.payment.secret_key = key;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.path, "./data/teachable.db");
        assert!(config.auth.token_secret.is_empty());
        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert_eq!(config.payment.api_base, "https://api.stripe.com");
    }

    #[test]
    fn test_parse_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [auth]
            token_secret = "from-file"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.auth.token_secret, "from-file");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.database.path, "./data/teachable.db");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ACCESS_TOKEN_SECRET", "from-env"),
            ("PAYMENT_SECRET_KEY", "sk_test_123"),
            ("CORS_ORIGINS", "https://a.example, ,https://b.example"),
        ]);

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.auth.token_secret, "from-env");
        assert_eq!(config.payment.secret_key, "sk_test_123");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.database.path, "./data/teachable.db");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_file("/nonexistent/teachable.toml").unwrap();
        assert_eq!(config.server.port, 5000);
    }
}
