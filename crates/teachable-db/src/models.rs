//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// A schemaless JSON document. Documents read from the store always carry
/// their identifier under the `_id` key.
pub type Document = Map<String, Value>;

/// Key under which a document's identifier is exposed
pub const ID_FIELD: &str = "_id";

/// Role value that grants admin access
pub const ADMIN_ROLE: &str = "admin";

/// Position value held by approved teachers
pub const TEACHER_POSITION: &str = "teacher";

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidCollection(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidCollection(s) => write!(f, "Invalid collection: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Course listings
    Classes,
    Users,
    Carts,
    /// Teacher applications
    Teachers,
    Assignments,
    Submissions,
    Reviews,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Classes => "allClass",
            Collection::Users => "users",
            Collection::Carts => "carts",
            Collection::Teachers => "teachers",
            Collection::Assignments => "assignments",
            Collection::Submissions => "submissions",
            Collection::Reviews => "reviews",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allClass" => Ok(Collection::Classes),
            "users" => Ok(Collection::Users),
            "carts" => Ok(Collection::Carts),
            "teachers" => Ok(Collection::Teachers),
            "assignments" => Ok(Collection::Assignments),
            "submissions" => Ok(Collection::Submissions),
            "reviews" => Ok(Collection::Reviews),
            _ => Err(ParseError::InvalidCollection(s.to_string())),
        }
    }
}

/// Equality filter over top-level string fields.
///
/// An empty filter matches every document in a collection.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn eq(mut self, field: &str, value: impl Into<String>) -> Self {
        self.conditions.push((field.to_string(), value.into()));
        self
    }

    /// Add the condition only when a value is present
    pub fn eq_opt(self, field: &str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    pub fn conditions(&self) -> &[(String, String)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// A document row as persisted
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub collection: String,
    pub body: Document,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Expose the stored body with its identifier attached
    pub fn into_document(self) -> Document {
        let mut body = self.body;
        body.insert(ID_FIELD.to_string(), Value::String(self.id));
        body
    }
}

/// Documents are stored as clients send them; a field holding anything but a
/// string reads as absent.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    string_or_none(deserializer).map(Option::unwrap_or_default)
}

/// User record as seen by the access gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_none")]
    pub role: Option<String>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Teacher application record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherApplication {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_none")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub status: Option<String>,
}

impl TeacherApplication {
    pub fn is_teacher(&self) -> bool {
        self.position.as_deref() == Some(TEACHER_POSITION)
    }
}

// ==================== Write Results ====================

/// Acknowledgement for a single insert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Acknowledgement for a single update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

/// Acknowledgement for a single delete
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for StoredDocument {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let body: String = row.try_get("body")?;
        let body: Document =
            serde_json::from_str(&body).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(StoredDocument {
            id: row.try_get("id")?,
            collection: row.try_get("collection")?,
            body,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}
