//! JWT token management

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;

/// Credential lifetime in seconds
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Identity payload exactly as supplied at issuance
    #[serde(flatten)]
    pub identity: Map<String, Value>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    /// The identity's email, if the payload carried one as a string
    pub fn email(&self) -> Option<&str> {
        self.identity.get("email").and_then(Value::as_str)
    }
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: Duration,
}

impl JwtManager {
    /// Create a new JWT manager. An empty secret is rejected.
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_lifetime: Duration::seconds(TOKEN_LIFETIME_SECS),
        })
    }

    /// Credential lifetime in seconds
    pub fn token_lifetime_secs(&self) -> i64 {
        self.token_lifetime.num_seconds()
    }

    /// Issue a credential for an identity payload
    pub fn generate_token(&self, identity: Map<String, Value>) -> Result<String, AuthError> {
        self.generate_token_at(identity, Utc::now())
    }

    /// Issue a credential as if at `issued_at`
    pub fn generate_token_at(
        &self,
        mut identity: Map<String, Value>,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        // Registered claims are always set by the issuer
        for key in ["iat", "exp", "jti"] {
            identity.remove(key);
        }

        let claims = Claims {
            identity,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.token_lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        debug!("Generating token for: {}", claims.email().unwrap_or("<no email>"));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(AuthError::from)
    }

    /// Validate a JWT token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Identity payloads are signed verbatim and may carry their own `aud`
        validation.validate_aud = false;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            },
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(email: &str) -> Map<String, Value> {
        json!({ "email": email }).as_object().cloned().unwrap()
    }

    #[test]
    fn test_token_generation_and_validation() {
        let manager = JwtManager::new("test-secret-key").unwrap();

        let token = manager.generate_token(identity("a@x.com")).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.email(), Some("a@x.com"));
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECS);
    }

    #[test]
    fn test_token_valid_just_inside_lifetime() {
        let manager = JwtManager::new("test-secret-key").unwrap();
        let issued_at = Utc::now() - Duration::seconds(TOKEN_LIFETIME_SECS - 60);

        let token = manager.generate_token_at(identity("a@x.com"), issued_at).unwrap();
        assert!(manager.validate_token(&token).is_ok());
    }

    #[test]
    fn test_token_expires_after_one_hour() {
        let manager = JwtManager::new("test-secret-key").unwrap();
        let issued_at = Utc::now() - Duration::seconds(TOKEN_LIFETIME_SECS + 1);

        let token = manager.generate_token_at(identity("a@x.com"), issued_at).unwrap();
        assert!(matches!(manager.validate_token(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_invalid_token() {
        let manager = JwtManager::new("test-secret-key").unwrap();

        let result = manager.validate_token("invalid-token");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = JwtManager::new("one-secret").unwrap();
        let verifier = JwtManager::new("another-secret").unwrap();

        let token = issuer.generate_token(identity("a@x.com")).unwrap();
        assert!(matches!(verifier.validate_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_same_payload_same_second_gives_distinct_tokens() {
        let manager = JwtManager::new("test-secret-key").unwrap();
        let now = Utc::now();

        let first = manager.generate_token_at(identity("a@x.com"), now).unwrap();
        let second = manager.generate_token_at(identity("a@x.com"), now).unwrap();

        assert_ne!(first, second);
        assert!(manager.validate_token(&first).is_ok());
        assert!(manager.validate_token(&second).is_ok());
    }

    #[test]
    fn test_client_cannot_extend_expiry() {
        let manager = JwtManager::new("test-secret-key").unwrap();
        let mut payload = identity("a@x.com");
        payload.insert("exp".to_string(), json!(i64::MAX));
        payload.insert("name".to_string(), json!("Alice"));

        let token = manager.generate_token(payload).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECS);
        assert_eq!(claims.identity.get("name"), Some(&json!("Alice")));
        assert!(!claims.identity.contains_key("exp"));
    }

    #[test]
    fn test_payload_with_audience_still_verifies() {
        let manager = JwtManager::new("test-secret-key").unwrap();
        let mut payload = identity("a@x.com");
        payload.insert("aud".to_string(), json!("web"));

        let token = manager.generate_token(payload).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.email(), Some("a@x.com"));
        assert_eq!(claims.identity.get("aud"), Some(&json!("web")));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(matches!(JwtManager::new(""), Err(AuthError::MissingSecret)));
        assert!(matches!(JwtManager::new("   "), Err(AuthError::MissingSecret)));
    }
}
