//! User and teacher application lookups

use serde_json::Value;

use crate::error::DbError;
use crate::models::{Collection, Filter, TeacherApplication, UserRecord};
use crate::repository::Database;

impl Database {
    // ==================== User Operations ====================

    /// Get a user by email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DbError> {
        let document = self
            .find_one(Collection::Users, &Filter::new().eq("email", email))
            .await?;

        document
            .map(|doc| serde_json::from_value(Value::Object(doc)).map_err(DbError::from))
            .transpose()
    }

    /// Get a teacher application by applicant email
    pub async fn find_teacher_by_email(
        &self,
        email: &str,
    ) -> Result<Option<TeacherApplication>, DbError> {
        let document = self
            .find_one(Collection::Teachers, &Filter::new().eq("email", email))
            .await?;

        document
            .map(|doc| serde_json::from_value(Value::Object(doc)).map_err(DbError::from))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_find_user_by_email_reads_current_role() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.find_user_by_email("a@x.com").await.unwrap().is_none());

        let id = db
            .insert_one(
                Collection::Users,
                json!({"email": "a@x.com", "name": "Alice"}).as_object().cloned().unwrap(),
            )
            .await
            .unwrap()
            .inserted_id;

        let user = db.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert!(!user.is_admin());

        db.update_one(
            Collection::Users,
            &id,
            json!({"role": "admin"}).as_object().cloned().unwrap(),
            false,
        )
        .await
        .unwrap();

        let user = db.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_find_teacher_by_email() {
        let db = Database::in_memory().await.unwrap();
        db.insert_one(
            Collection::Teachers,
            json!({"email": "t@x.com", "position": "teacher", "status": "approved"})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .await
        .unwrap();

        let teacher = db.find_teacher_by_email("t@x.com").await.unwrap().unwrap();
        assert!(teacher.is_teacher());
        assert_eq!(teacher.status.as_deref(), Some("approved"));

        assert!(db.find_teacher_by_email("T@x.com").await.unwrap().is_none());
    }
}
