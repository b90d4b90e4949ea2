//! Group repository.

use super::models::Group;
use super::DbError;
use sqlx::SqlitePool;

/// Repository for group records.
pub struct GroupRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GroupRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        username: &str,
        bot_token: &str,
        creator_id: i64,
    ) -> Result<Group, DbError> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO groups (username, bot_token, creator_id, disabled, default_ban_mask, n_members, n_messages, created_at)
            VALUES (?, ?, ?, 0, 0, 0, 0, ?)
            "#,
        )
        .bind(username)
        .bind(bot_token)
        .bind(creator_id)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(Group {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            bot_token: bot_token.to_string(),
            creator_id,
            disabled: false,
            default_ban_mask: 0,
            welcome_message: None,
            rules: None,
            n_members: 0,
            n_messages: 0,
            created_at: now,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Group, DbError> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::GroupNotFound(id.to_string()))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Group>, DbError> {
        let group = sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        Ok(group)
    }

    pub async fn list_enabled(&self) -> Result<Vec<Group>, DbError> {
        let groups = sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE disabled = 0")
            .fetch_all(self.pool)
            .await?;

        Ok(groups)
    }

    pub async fn set_disabled(&self, id: i64, disabled: bool) -> Result<(), DbError> {
        sqlx::query("UPDATE groups SET disabled = ? WHERE id = ?")
            .bind(disabled)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_default_ban_mask(&self, id: i64, mask: i64) -> Result<(), DbError> {
        sqlx::query("UPDATE groups SET default_ban_mask = ? WHERE id = ?")
            .bind(mask)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_welcome_message(&self, id: i64, message: Option<&str>) -> Result<(), DbError> {
        sqlx::query("UPDATE groups SET welcome_message = ? WHERE id = ?")
            .bind(message)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_rules(&self, id: i64, rules: Option<&str>) -> Result<(), DbError> {
        sqlx::query("UPDATE groups SET rules = ? WHERE id = ?")
            .bind(rules)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn increment_n_members(&self, id: i64, delta: i64) -> Result<(), DbError> {
        sqlx::query("UPDATE groups SET n_members = n_members + ? WHERE id = ?")
            .bind(delta)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn increment_n_messages(&self, id: i64) -> Result<(), DbError> {
        sqlx::query("UPDATE groups SET n_messages = n_messages + 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[tokio::test]
    async fn create_and_find_round_trips() {
        let db = Database::new(":memory:").await.unwrap();
        let creator = db.users().find_or_create("tg:1", "Alice").await.unwrap();
        let group = db.groups().create("anonchat", "123:abc", creator.id).await.unwrap();
        let found = db.groups().find_by_id(group.id).await.unwrap();
        assert_eq!(found.username, "anonchat");
        assert!(!found.disabled);
    }
}
