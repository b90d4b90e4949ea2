//! Ban matrix repository.

use super::models::{Ban, BanType};
use super::DbError;
use sqlx::SqlitePool;

/// Repository for the per-member ban matrix.
///
/// A ban is a row (group, member, type, expiry), not a flag on the member, so
/// temporary and permanent restrictions share one query path.
pub struct BanRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BanRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ban(
        &self,
        group_id: i64,
        member_id: i64,
        ban_type: BanType,
        expires_at: Option<i64>,
    ) -> Result<(), DbError> {
        self.unban(group_id, member_id, ban_type).await?;

        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO bans (scope, group_id, member_id, ban_type, expires_at, created_at)
            VALUES (1, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(group_id)
        .bind(member_id)
        .bind(ban_type.as_str())
        .bind(expires_at)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn unban(&self, group_id: i64, member_id: i64, ban_type: BanType) -> Result<(), DbError> {
        sqlx::query(
            "DELETE FROM bans WHERE group_id = ? AND member_id = ? AND ban_type = ? AND scope = 1",
        )
        .bind(group_id)
        .bind(member_id)
        .bind(ban_type.as_str())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// True if `member_id` is currently restricted by `ban_type`, considering
    /// expiry but not auto-deleting expired rows (a lazy sweep is left to a
    /// background pass, not the hot read path).
    pub async fn is_banned(
        &self,
        group_id: i64,
        member_id: i64,
        ban_type: BanType,
    ) -> Result<bool, DbError> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, Ban>(
            r#"
            SELECT * FROM bans
            WHERE group_id = ? AND member_id = ? AND ban_type = ? AND scope = 1
            "#,
        )
        .bind(group_id)
        .bind(member_id)
        .bind(ban_type.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(match row {
            Some(ban) => !ban.is_expired(chrono::DateTime::from_timestamp(now, 0).unwrap()),
            None => false,
        })
    }

    pub async fn list_for_member(&self, group_id: i64, member_id: i64) -> Result<Vec<Ban>, DbError> {
        let bans = sqlx::query_as::<_, Ban>(
            "SELECT * FROM bans WHERE group_id = ? AND member_id = ? AND scope = 1",
        )
        .bind(group_id)
        .bind(member_id)
        .fetch_all(self.pool)
        .await?;

        Ok(bans)
    }

    pub async fn purge_expired(&self, group_id: i64) -> Result<u64, DbError> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            "DELETE FROM bans WHERE group_id = ? AND expires_at IS NOT NULL AND expires_at <= ?",
        )
        .bind(group_id)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[tokio::test]
    async fn ban_and_unban_round_trip() {
        let db = Database::new(":memory:").await.unwrap();
        let user = db.users().find_or_create("tg:1", "Alice").await.unwrap();
        let group = db.groups().create("anonchat", "123:abc", user.id).await.unwrap();
        let member = db.members().join_or_get(user.id, group.id).await.unwrap();

        assert!(!db.bans().is_banned(group.id, member.id, BanType::Message).await.unwrap());
        db.bans().ban(group.id, member.id, BanType::Message, None).await.unwrap();
        assert!(db.bans().is_banned(group.id, member.id, BanType::Message).await.unwrap());
        db.bans().unban(group.id, member.id, BanType::Message).await.unwrap();
        assert!(!db.bans().is_banned(group.id, member.id, BanType::Message).await.unwrap());
    }

    #[tokio::test]
    async fn expired_ban_is_not_active() {
        let db = Database::new(":memory:").await.unwrap();
        let user = db.users().find_or_create("tg:1", "Alice").await.unwrap();
        let group = db.groups().create("anonchat", "123:abc", user.id).await.unwrap();
        let member = db.members().join_or_get(user.id, group.id).await.unwrap();

        let past = chrono::Utc::now().timestamp() - 10;
        db.bans().ban(group.id, member.id, BanType::Media, Some(past)).await.unwrap();
        assert!(!db.bans().is_banned(group.id, member.id, BanType::Media).await.unwrap());
    }
}
