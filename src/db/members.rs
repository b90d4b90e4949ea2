//! Member repository.

use super::models::Member;
use super::DbError;
use crate::engine::Role;
use sqlx::SqlitePool;

/// Repository for (user, group) membership records.
pub struct MemberRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MemberRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the membership row for a user in a group, if any.
    pub async fn find(&self, user_id: i64, group_id: i64) -> Result<Option<Member>, DbError> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE user_id = ? AND group_id = ?",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(member)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Member, DbError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(DbError::MemberNotFound)
    }

    /// Join a group as a fresh guest, or return the existing membership.
    pub async fn join_or_get(&self, user_id: i64, group_id: i64) -> Result<Member, DbError> {
        if let Some(member) = self.find(user_id, group_id).await? {
            return Ok(member);
        }

        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO members (user_id, group_id, role, last_activity, n_messages, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(user_id)
        .bind(group_id)
        .bind(Role::Guest.as_i32())
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(Member {
            id: result.last_insert_rowid(),
            user_id,
            group_id,
            role: super::models::RoleColumn(Role::Guest),
            pinned_mask: None,
            last_mask: None,
            last_activity: now,
            n_messages: 0,
            created_at: now,
        })
    }

    pub async fn set_role(&self, id: i64, role: Role) -> Result<(), DbError> {
        sqlx::query("UPDATE members SET role = ? WHERE id = ?")
            .bind(role.as_i32())
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_pinned_mask(&self, id: i64, mask: Option<&str>) -> Result<(), DbError> {
        sqlx::query("UPDATE members SET pinned_mask = ? WHERE id = ?")
            .bind(mask)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_last_mask(&self, id: i64, mask: &str) -> Result<(), DbError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query("UPDATE members SET last_mask = ?, last_activity = ? WHERE id = ?")
            .bind(mask)
            .bind(now)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn touch_activity(&self, id: i64) -> Result<(), DbError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query("UPDATE members SET last_activity = ?, n_messages = n_messages + 1 WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_active(&self, group_id: i64) -> Result<Vec<Member>, DbError> {
        let members = sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE group_id = ? AND role > 0",
        )
        .bind(group_id)
        .fetch_all(self.pool)
        .await?;

        Ok(members)
    }

    pub async fn count_by_role_at_least(&self, group_id: i64, role: Role) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM members WHERE group_id = ? AND role >= ?",
        )
        .bind(group_id)
        .bind(role.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[tokio::test]
    async fn join_or_get_assigns_guest_role() {
        let db = Database::new(":memory:").await.unwrap();
        let user = db.users().find_or_create("tg:1", "Alice").await.unwrap();
        let group = db.groups().create("anonchat", "123:abc", user.id).await.unwrap();

        let member = db.members().join_or_get(user.id, group.id).await.unwrap();
        assert_eq!(member.role(), Role::Guest);

        let again = db.members().join_or_get(user.id, group.id).await.unwrap();
        assert_eq!(member.id, again.id);
    }

    #[tokio::test]
    async fn set_role_persists() {
        let db = Database::new(":memory:").await.unwrap();
        let user = db.users().find_or_create("tg:1", "Alice").await.unwrap();
        let group = db.groups().create("anonchat", "123:abc", user.id).await.unwrap();
        let member = db.members().join_or_get(user.id, group.id).await.unwrap();

        db.members().set_role(member.id, Role::Member).await.unwrap();
        let reloaded = db.members().find_by_id(member.id).await.unwrap();
        assert_eq!(reloaded.role(), Role::Member);
    }
}
