//! Access gate stages
//!
//! Authentication turns an `Authorization` header into an [`AuthUser`].
//! The two authorization stages run only after it succeeds: the self-match
//! check compares a caller-supplied subject with the credential, and the
//! role check compares a freshly read stored role with a required value.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::jwt::{Claims, JwtManager};

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Email claim from the credential, the only trusted identity
    pub email: Option<String>,
    pub claims: Claims,
}

impl AuthUser {
    /// Create from JWT claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            email: claims.email().map(str::to_string),
            claims,
        }
    }
}

/// Extract the token from an authorization header value.
///
/// The token is the second whitespace-separated segment; the scheme word
/// itself is not inspected.
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    header
        .split_whitespace()
        .nth(1)
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Authentication stage
pub fn authenticate(headers: &HeaderMap, jwt: &JwtManager) -> Result<AuthUser, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = extract_bearer_token(header)?;
    let claims = jwt.validate_token(token).inspect_err(|e| {
        warn!("Rejected credential: {}", e);
    })?;
    let user = AuthUser::from_claims(claims);

    debug!("Authenticated: {}", user.email.as_deref().unwrap_or("<no email>"));

    Ok(user)
}

/// Self-match stage: the requested subject must be the caller
pub fn ensure_self_match(subject: &str, user: &AuthUser) -> Result<(), AuthError> {
    if user.email.as_deref() != Some(subject) {
        debug!(
            "Self-match failed: {} requested {}",
            user.email.as_deref().unwrap_or("<no email>"),
            subject
        );
        return Err(AuthError::InsufficientPermissions);
    }
    Ok(())
}

/// Role stage: `stored_role` is the caller's current role, `None` when the
/// caller has no record. Missing record and wrong role are the same rejection.
pub fn ensure_role(stored_role: Option<&str>, required: &str) -> Result<(), AuthError> {
    if stored_role != Some(required) {
        return Err(AuthError::InsufficientPermissions);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn manager() -> JwtManager {
        JwtManager::new("gate-test-secret").unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn token_for(jwt: &JwtManager, email: &str) -> String {
        jwt.generate_token(json!({ "email": email }).as_object().cloned().unwrap())
            .unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert_eq!(extract_bearer_token("bearer   abc").unwrap(), "abc");
        assert!(matches!(
            extract_bearer_token("Bearer"),
            Err(AuthError::InvalidAuthHeader)
        ));
        assert!(matches!(extract_bearer_token(""), Err(AuthError::InvalidAuthHeader)));
    }

    #[test]
    fn test_authenticate_missing_header() {
        let result = authenticate(&HeaderMap::new(), &manager());
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[test]
    fn test_authenticate_valid_token() {
        let jwt = manager();
        let token = token_for(&jwt, "a@x.com");

        let user = authenticate(&headers_with(&format!("Bearer {}", token)), &jwt).unwrap();
        assert_eq!(user.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_authenticate_wrongly_signed_token() {
        let other = JwtManager::new("someone-else").unwrap();
        let token = token_for(&other, "a@x.com");

        let result = authenticate(&headers_with(&format!("Bearer {}", token)), &manager());
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_self_match() {
        let jwt = manager();
        let user = AuthUser::from_claims(jwt.validate_token(&token_for(&jwt, "alice@x.com")).unwrap());

        assert!(ensure_self_match("alice@x.com", &user).is_ok());
        assert!(matches!(
            ensure_self_match("bob@x.com", &user),
            Err(AuthError::InsufficientPermissions)
        ));
        assert!(ensure_self_match("Alice@x.com", &user).is_err());
    }

    #[test]
    fn test_self_match_without_email_claim() {
        let jwt = manager();
        let token = jwt
            .generate_token(json!({ "name": "anon" }).as_object().cloned().unwrap())
            .unwrap();
        let user = AuthUser::from_claims(jwt.validate_token(&token).unwrap());

        assert!(user.email.is_none());
        assert!(ensure_self_match("anon", &user).is_err());
    }

    #[test]
    fn test_ensure_role() {
        assert!(ensure_role(Some("admin"), "admin").is_ok());
        assert!(ensure_role(Some("student"), "admin").is_err());
        assert!(ensure_role(None, "admin").is_err());
    }
}
