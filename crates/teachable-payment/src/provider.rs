//! Payment provider abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PaymentError;

/// A created payment intent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// Creates payment intents with an external processor
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create an intent for `amount` minor currency units (cents for `usd`)
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Convert a decimal price to minor units, truncating toward zero.
///
/// NaN converts to 0 and out-of-range prices saturate.
pub fn price_to_minor_units(price: f64) -> i64 {
    (price * 100.0).trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_to_minor_units() {
        assert_eq!(price_to_minor_units(12.5), 1250);
        assert_eq!(price_to_minor_units(100.0), 10000);
        assert_eq!(price_to_minor_units(0.0), 0);
        // binary floating point: 19.99 * 100 is just below 1999
        assert_eq!(price_to_minor_units(19.99), 1998);
        assert_eq!(price_to_minor_units(f64::NAN), 0);
    }
}
