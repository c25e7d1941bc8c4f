//! Request/Response DTOs

use serde::{Deserialize, Deserializer, Serialize, de};
use teachable_db::InsertResult;

// ==================== Auth Types ====================

/// Credential response
#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// ==================== Query Types ====================

/// Optional owner filter, e.g. `?email=a@x.com`
#[derive(Deserialize, Default)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: Option<String>,
}

// ==================== User Types ====================

/// Answer to "is this caller an admin"
#[derive(Serialize, Deserialize)]
pub struct AdminStatus {
    pub admin: bool,
}

/// Answer to "does this caller hold the teacher position"
#[derive(Serialize, Deserialize)]
pub struct TeacherStatus {
    pub teacher: bool,
}

/// Result of registering a user
#[derive(Serialize)]
#[serde(untagged)]
pub enum CreateUserResponse {
    Inserted(InsertResult),
    Exists {
        message: String,
        #[serde(rename = "insertedId")]
        inserted_id: Option<String>,
    },
}

// ==================== Payment Types ====================

/// Payment intent request
#[derive(Deserialize)]
pub struct PriceRequest {
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub price: f64,
}

/// Prices arrive either as JSON numbers or as numeric strings.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    match Price::deserialize(deserializer)? {
        Price::Number(n) => Ok(n),
        Price::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("price is not a number: {:?}", s))),
    }
}

/// Payment intent response
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSecretResponse {
    pub client_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_accepts_numbers_and_numeric_strings() {
        let parse = |v| serde_json::from_value::<PriceRequest>(v).map(|r| r.price);

        assert_eq!(parse(json!({"price": 12.5})).unwrap(), 12.5);
        assert_eq!(parse(json!({"price": 40})).unwrap(), 40.0);
        assert_eq!(parse(json!({"price": "19.99"})).unwrap(), 19.99);
        assert!(parse(json!({"price": "twelve"})).is_err());
        assert!(parse(json!({"price": null})).is_err());
        assert!(parse(json!({})).is_err());
    }
}
