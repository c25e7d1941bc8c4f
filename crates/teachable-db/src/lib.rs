//! Teachable Class Document Store
//!
//! This crate provides the collection-oriented document store used by the
//! Teachable Class backend, persisted in SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
