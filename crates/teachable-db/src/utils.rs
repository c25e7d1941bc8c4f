//! Shared utility functions

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Document, ID_FIELD};

/// Parse a datetime string (RFC3339 format) or return current time
pub fn parse_datetime_or_now(s: &str) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Generate a fresh document identifier
pub fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Apply top-level `$set` semantics: every key in `fields` replaces the
/// matching key in `body`. The identifier key is never written.
///
/// Returns whether `body` changed.
pub fn apply_set(body: &mut Document, fields: Document) -> bool {
    let mut changed = false;
    for (key, value) in fields {
        if key == ID_FIELD {
            continue;
        }
        if body.get(&key) != Some(&value) {
            body.insert(key, value);
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_apply_set_merges_and_reports_change() {
        let mut body = doc(json!({"title": "Rust 101", "status": "pending"}));
        let changed = apply_set(&mut body, doc(json!({"status": "approve"})));
        assert!(changed);
        assert_eq!(body, doc(json!({"title": "Rust 101", "status": "approve"})));
    }

    #[test]
    fn test_apply_set_same_value_is_not_a_change() {
        let mut body = doc(json!({"status": "approve"}));
        assert!(!apply_set(&mut body, doc(json!({"status": "approve"}))));
    }

    #[test]
    fn test_apply_set_ignores_id() {
        let mut body = doc(json!({"title": "Rust 101"}));
        assert!(!apply_set(&mut body, doc(json!({"_id": "other"}))));
        assert!(!body.contains_key("_id"));
    }

    #[test]
    fn test_new_document_id_is_unique_hex() {
        let a = new_document_id();
        let b = new_document_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_parse_datetime_or_now() {
        let parsed = parse_datetime_or_now("2024-01-01T12:00:00Z");
        assert_eq!(parsed.to_rfc3339(), "2024-01-01T12:00:00+00:00");

        let now_before = Utc::now();
        let parsed = parse_datetime_or_now("invalid");
        let now_after = Utc::now();
        assert!(parsed >= now_before && parsed <= now_after);
    }
}
