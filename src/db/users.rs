//! User repository.

use super::models::User;
use super::DbError;
use sqlx::SqlitePool;

/// Repository for transport identities.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find or create a user by their transport-level uid.
    pub async fn find_or_create(
        &self,
        transport_uid: &str,
        display_name: &str,
    ) -> Result<User, DbError> {
        if let Some(user) = self.find_by_transport_uid(transport_uid).await? {
            return Ok(user);
        }

        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            "INSERT INTO users (transport_uid, display_name, created_at) VALUES (?, ?, ?)",
        )
        .bind(transport_uid)
        .bind(display_name)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            transport_uid: transport_uid.to_string(),
            display_name: display_name.to_string(),
            created_at: now,
        })
    }

    pub async fn find_by_transport_uid(&self, transport_uid: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE transport_uid = ?")
            .bind(transport_uid)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User, DbError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::UserNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[tokio::test]
    async fn find_or_create_is_idempotent() {
        let db = Database::new(":memory:").await.unwrap();
        let repo = db.users();
        let a = repo.find_or_create("tg:1", "Alice").await.unwrap();
        let b = repo.find_or_create("tg:1", "Alice Again").await.unwrap();
        assert_eq!(a.id, b.id);
    }
}
