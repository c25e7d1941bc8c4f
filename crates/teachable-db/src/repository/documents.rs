//! Collection operations
//!
//! Every operation touches a single document (or a single filtered scan) and
//! reports the same acknowledgements a document database would.

use chrono::Utc;
use tracing::debug;

use crate::error::DbError;
use crate::models::{
    Collection, DeleteResult, Document, Filter, ID_FIELD, InsertResult, StoredDocument,
    UpdateResult,
};
use crate::repository::Database;
use crate::utils::{apply_set, new_document_id};

const SELECT_DOCUMENTS: &str =
    "SELECT id, collection, body, created_at, updated_at FROM documents";

/// Build a JSON path for a top-level field, rejecting anything that is not
/// a plain identifier since the path is spliced into SQL.
fn json_path(field: &str) -> Result<String, DbError> {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DbError::InvalidDocument(format!(
            "Unsupported filter field: {}",
            field
        )));
    }
    Ok(format!("$.{}", field))
}

impl Database {
    // ==================== Document Operations ====================

    async fn select(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: Option<i64>,
    ) -> Result<Vec<StoredDocument>, DbError> {
        let mut sql = format!("{} WHERE collection = ?", SELECT_DOCUMENTS);
        for (field, _) in filter.conditions() {
            sql.push_str(&format!(" AND json_extract(body, '{}') = ?", json_path(field)?));
        }
        sql.push_str(" ORDER BY seq");
        if limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut query = sqlx::query(&sql).bind(collection.as_str());
        for (_, value) in filter.conditions() {
            query = query.bind(value.as_str());
        }
        if let Some(limit) = limit {
            query = query.bind(limit);
        }

        let rows = query.fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| StoredDocument::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// List documents matching every condition in `filter`, in insertion order
    pub async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, DbError> {
        debug!("find in {} ({} conditions)", collection, filter.conditions().len());

        let documents = self.select(collection, filter, None).await?;
        Ok(documents.into_iter().map(StoredDocument::into_document).collect())
    }

    /// Get the first document matching `filter`
    pub async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DbError> {
        let mut documents = self.select(collection, filter, Some(1)).await?;
        Ok(documents.pop().map(StoredDocument::into_document))
    }

    /// Get a document by its identifier
    pub async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, DbError> {
        let result = sqlx::query(&format!("{} WHERE collection = ? AND id = ?", SELECT_DOCUMENTS))
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result
            .map(|row| {
                StoredDocument::try_from(&row)
                    .map(StoredDocument::into_document)
                    .map_err(DbError::from)
            })
            .transpose()
    }

    /// Insert a document under a freshly generated identifier.
    ///
    /// Any `_id` supplied in the body is discarded.
    pub async fn insert_one(
        &self,
        collection: Collection,
        mut body: Document,
    ) -> Result<InsertResult, DbError> {
        body.remove(ID_FIELD);

        let id = new_document_id();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO documents (id, collection, body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(collection.as_str())
        .bind(serde_json::to_string(&body)?)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("Inserted {} into {}", id, collection);

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    /// Merge `fields` into the document with identifier `id`.
    ///
    /// With `upsert`, a missing document is created under `id` from `fields`.
    pub async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
        upsert: bool,
    ) -> Result<UpdateResult, DbError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query(&format!("{} WHERE collection = ? AND id = ?", SELECT_DOCUMENTS))
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let result = match existing {
            Some(row) => {
                let mut body = StoredDocument::try_from(&row)?.body;
                let changed = apply_set(&mut body, fields);

                if changed {
                    sqlx::query(
                        r#"
                        UPDATE documents
                        SET body = ?, updated_at = ?
                        WHERE collection = ? AND id = ?
                        "#,
                    )
                    .bind(serde_json::to_string(&body)?)
                    .bind(now.to_rfc3339())
                    .bind(collection.as_str())
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                }

                UpdateResult {
                    acknowledged: true,
                    matched_count: 1,
                    modified_count: u64::from(changed),
                    upserted_count: 0,
                    upserted_id: None,
                }
            }
            None if upsert => {
                let mut body = Document::new();
                apply_set(&mut body, fields);

                sqlx::query(
                    r#"
                    INSERT INTO documents (id, collection, body, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(id)
                .bind(collection.as_str())
                .bind(serde_json::to_string(&body)?)
                .bind(now.to_rfc3339())
                .bind(now.to_rfc3339())
                .execute(&mut *tx)
                .await?;

                UpdateResult {
                    acknowledged: true,
                    matched_count: 0,
                    modified_count: 0,
                    upserted_count: 1,
                    upserted_id: Some(id.to_string()),
                }
            }
            None => UpdateResult {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_count: 0,
                upserted_id: None,
            },
        };

        tx.commit().await?;

        debug!(
            "Updated {} in {} (matched={}, modified={}, upserted={})",
            id, collection, result.matched_count, result.modified_count, result.upserted_count
        );

        Ok(result)
    }

    /// Delete a document by its identifier
    pub async fn delete_one(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<DeleteResult, DbError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }
}
