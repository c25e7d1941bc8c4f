//! Stripe payment-intent client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::PaymentError;
use crate::provider::{PaymentIntent, PaymentProvider};

/// Default Stripe API base URL
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Stripe client configuration
#[derive(Clone, Debug)]
pub struct StripeClientConfig {
    /// API base URL, without trailing slash
    pub api_base: String,
    /// Secret API key
    pub secret_key: String,
}

/// Payment intent as returned by Stripe
#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Stripe API client
pub struct StripeClient {
    config: StripeClientConfig,
    client: Client,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(config: StripeClientConfig) -> Result<Self, PaymentError> {
        let client = Client::builder().build()?;

        if config.secret_key.is_empty() {
            warn!("Stripe secret key is empty; payment intents will fail");
        } else {
            info!("Created Stripe client for {}", config.api_base);
        }

        Ok(Self { config, client })
    }

    fn payment_intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.config.api_base.trim_end_matches('/'))
    }
}

/// Pull the human-readable message out of a Stripe error body
fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        if self.config.secret_key.is_empty() {
            return Err(PaymentError::NotConfigured);
        }

        debug!("Creating payment intent: {} {}", amount, currency);

        let amount = amount.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", currency),
            ("payment_method_types[]", "card"),
        ];

        let response = self
            .client
            .post(self.payment_intents_url())
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Upstream {
                status: status.as_u16(),
                message: parse_error_message(&body),
            });
        }

        let intent: PaymentIntentResponse = response.json().await?;
        let client_secret = intent.client_secret.ok_or_else(|| {
            PaymentError::InvalidResponse("Missing client_secret".to_string())
        })?;

        info!("Created payment intent {}", intent.id);

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_base: &str, secret_key: &str) -> StripeClient {
        StripeClient::new(StripeClientConfig {
            api_base: api_base.to_string(),
            secret_key: secret_key.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_payment_intents_url() {
        assert_eq!(
            client("https://api.stripe.com/", "sk_test").payment_intents_url(),
            "https://api.stripe.com/v1/payment_intents"
        );
    }

    #[test]
    fn test_parse_error_message() {
        let body = r#"{"error":{"message":"Amount must be at least $0.50 usd","type":"invalid_request_error"}}"#;
        assert_eq!(parse_error_message(body), "Amount must be at least $0.50 usd");
        assert_eq!(parse_error_message("gateway timeout"), "gateway timeout");
    }

    #[tokio::test]
    async fn test_missing_secret_key() {
        let result = client(DEFAULT_API_BASE, "").create_payment_intent(1000, "usd").await;
        assert!(matches!(result, Err(PaymentError::NotConfigured)));
    }
}
