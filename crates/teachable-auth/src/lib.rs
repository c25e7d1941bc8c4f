//! Teachable Class Authentication and Authorization
//!
//! This crate provides credential issuance (signed, one-hour JWTs over an
//! arbitrary identity payload) and the checks that make up the access gate:
//! bearer authentication, self-match and role authorization.

pub mod error;
pub mod gate;
pub mod jwt;

pub use error::AuthError;
pub use gate::{AuthUser, authenticate, ensure_role, ensure_self_match, extract_bearer_token};
pub use jwt::{Claims, JwtManager, TOKEN_LIFETIME_SECS};
