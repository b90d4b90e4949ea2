//! Message repository: originals, their redirected copies, and PMs.

use super::models::{Message, PmBan, PmMessage, RedirectedMessage};
use super::DbError;
use sqlx::SqlitePool;

/// Repository for message history and the reply-resolution graph.
pub struct MessageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MessageRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record_original(
        &self,
        member_id: i64,
        group_id: i64,
        mask: &str,
        mid: i64,
        reply_to_message_id: Option<i64>,
    ) -> Result<Message, DbError> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO messages (member_id, group_id, mask, mid, reply_to_message_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(member_id)
        .bind(group_id)
        .bind(mask)
        .bind(mid)
        .bind(reply_to_message_id)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(Message {
            id: result.last_insert_rowid(),
            member_id,
            group_id,
            mask: mask.to_string(),
            mid,
            reply_to_message_id,
            created_at: now,
        })
    }

    pub async fn record_redirected(
        &self,
        message_id: i64,
        to_member_id: i64,
        mid: i64,
    ) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO redirected_messages (message_id, to_member_id, mid) VALUES (?, ?, ?)",
        )
        .bind(message_id)
        .bind(to_member_id)
        .bind(mid)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_member_mid(&self, member_id: i64, mid: i64) -> Result<Option<Message>, DbError> {
        let message = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE member_id = ? AND mid = ?",
        )
        .bind(member_id)
        .bind(mid)
        .fetch_optional(self.pool)
        .await?;

        Ok(message)
    }

    pub async fn find_redirected(
        &self,
        to_member_id: i64,
        mid: i64,
    ) -> Result<Option<RedirectedMessage>, DbError> {
        let row = sqlx::query_as::<_, RedirectedMessage>(
            "SELECT * FROM redirected_messages WHERE to_member_id = ? AND mid = ?",
        )
        .bind(to_member_id)
        .bind(mid)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Look up a recipient's redirected copy of a specific original message,
    /// used to resolve per-recipient reply targets during broadcast.
    pub async fn find_redirected_by_message(
        &self,
        message_id: i64,
        to_member_id: i64,
    ) -> Result<Option<RedirectedMessage>, DbError> {
        let row = sqlx::query_as::<_, RedirectedMessage>(
            "SELECT * FROM redirected_messages WHERE message_id = ? AND to_member_id = ?",
        )
        .bind(message_id)
        .bind(to_member_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Message, DbError> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(DbError::MemberNotFound)
    }

    pub async fn list_redirected_for_message(
        &self,
        message_id: i64,
    ) -> Result<Vec<RedirectedMessage>, DbError> {
        let rows = sqlx::query_as::<_, RedirectedMessage>(
            "SELECT * FROM redirected_messages WHERE message_id = ?",
        )
        .bind(message_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn record_pm(
        &self,
        from_member_id: i64,
        to_member_id: i64,
        mid: i64,
        redirected_mid: i64,
    ) -> Result<PmMessage, DbError> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO pm_messages (from_member_id, to_member_id, mid, redirected_mid, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(from_member_id)
        .bind(to_member_id)
        .bind(mid)
        .bind(redirected_mid)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(PmMessage {
            id: result.last_insert_rowid(),
            from_member_id,
            to_member_id,
            mid,
            redirected_mid,
            created_at: now,
        })
    }

    pub async fn find_pm_by_redirected_mid(
        &self,
        to_member_id: i64,
        redirected_mid: i64,
    ) -> Result<Option<PmMessage>, DbError> {
        let row = sqlx::query_as::<_, PmMessage>(
            "SELECT * FROM pm_messages WHERE to_member_id = ? AND redirected_mid = ?",
        )
        .bind(to_member_id)
        .bind(redirected_mid)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    pub async fn is_pm_banned(&self, from_member_id: i64, to_member_id: i64) -> Result<bool, DbError> {
        let ban = sqlx::query_as::<_, PmBan>(
            "SELECT * FROM pm_bans WHERE from_member_id = ? AND to_member_id = ?",
        )
        .bind(from_member_id)
        .bind(to_member_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(ban.is_some())
    }

    pub async fn set_pm_ban(
        &self,
        from_member_id: i64,
        to_member_id: i64,
        banned: bool,
    ) -> Result<(), DbError> {
        if banned {
            let now = chrono::Utc::now().timestamp();
            sqlx::query(
                r#"
                INSERT INTO pm_bans (from_member_id, to_member_id, created_at) VALUES (?, ?, ?)
                ON CONFLICT(from_member_id, to_member_id) DO NOTHING
                "#,
            )
            .bind(from_member_id)
            .bind(to_member_id)
            .bind(now)
            .execute(self.pool)
            .await?;
        } else {
            sqlx::query("DELETE FROM pm_bans WHERE from_member_id = ? AND to_member_id = ?")
                .bind(from_member_id)
                .bind(to_member_id)
                .execute(self.pool)
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[tokio::test]
    async fn records_original_and_redirected() {
        let db = Database::new(":memory:").await.unwrap();
        let user = db.users().find_or_create("tg:1", "Alice").await.unwrap();
        let group = db.groups().create("anonchat", "123:abc", user.id).await.unwrap();
        let member = db.members().join_or_get(user.id, group.id).await.unwrap();

        let original = db
            .messages()
            .record_original(member.id, group.id, "🐶", 100, None)
            .await
            .unwrap();
        db.messages().record_redirected(original.id, member.id, 200).await.unwrap();

        let found = db.messages().find_redirected(member.id, 200).await.unwrap();
        assert_eq!(found.unwrap().message_id, original.id);
    }

    #[tokio::test]
    async fn pm_ban_round_trips() {
        let db = Database::new(":memory:").await.unwrap();
        let a = db.users().find_or_create("tg:1", "Alice").await.unwrap();
        let group = db.groups().create("anonchat", "123:abc", a.id).await.unwrap();
        let ma = db.members().join_or_get(a.id, group.id).await.unwrap();
        let b = db.users().find_or_create("tg:2", "Bob").await.unwrap();
        let mb = db.members().join_or_get(b.id, group.id).await.unwrap();

        assert!(!db.messages().is_pm_banned(ma.id, mb.id).await.unwrap());
        db.messages().set_pm_ban(ma.id, mb.id, true).await.unwrap();
        assert!(db.messages().is_pm_banned(ma.id, mb.id).await.unwrap());
        db.messages().set_pm_ban(ma.id, mb.id, false).await.unwrap();
        assert!(!db.messages().is_pm_banned(ma.id, mb.id).await.unwrap());
    }
}
