//! Teachable Class Payments
//!
//! This crate provides the payment-intent collaborator: a provider trait the
//! API depends on and the Stripe HTTP client that implements it.

pub mod error;
pub mod provider;
pub mod stripe;

pub use error::PaymentError;
pub use provider::{PaymentIntent, PaymentProvider, price_to_minor_units};
pub use stripe::{DEFAULT_API_BASE, StripeClient, StripeClientConfig};
