//! Database-facing entity models.

use crate::engine::Role;
use chrono::{DateTime, Utc};

/// A transport-level identity. Exists independent of groups.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub transport_uid: String,
    pub display_name: String,
    pub created_at: i64,
}

/// A logical anonymous room, backed by its own bot endpoint.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub username: String,
    pub bot_token: String,
    pub creator_id: i64,
    pub disabled: bool,
    /// Group-wide default ban mask, stored as a bitmask over `BanType`.
    pub default_ban_mask: i64,
    pub welcome_message: Option<String>,
    pub rules: Option<String>,
    pub n_members: i64,
    pub n_messages: i64,
    pub created_at: i64,
}

impl Group {
    pub fn group_wide_ban(&self, ban_type: BanType) -> bool {
        self.default_ban_mask & ban_type.bit() != 0
    }
}

/// A (User, Group) pair with role, ban state and activity tracking.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Member {
    pub id: i64,
    pub user_id: i64,
    pub group_id: i64,
    #[sqlx(try_from = "i64")]
    pub role: RoleColumn,
    pub pinned_mask: Option<String>,
    pub last_mask: Option<String>,
    pub last_activity: i64,
    pub n_messages: i64,
    pub created_at: i64,
}

impl Member {
    pub fn role(&self) -> Role {
        self.role.0
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.last_activity, 0).unwrap_or_else(Utc::now)
    }
}

/// Newtype so `sqlx`'s `try_from` column conversion can bridge the `i64`
/// column and the `Role` lattice without a manual `Decode` impl.
#[derive(Debug, Clone, Copy)]
pub struct RoleColumn(pub Role);

impl TryFrom<i64> for RoleColumn {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Role::from_i32(value as i32)
            .map(RoleColumn)
            .ok_or_else(|| format!("invalid role value: {value}"))
    }
}

/// An original member-authored message.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub member_id: i64,
    pub group_id: i64,
    pub mask: String,
    pub mid: i64,
    pub reply_to_message_id: Option<i64>,
    pub created_at: i64,
}

/// A per-recipient redirected copy of an original message.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RedirectedMessage {
    pub id: i64,
    pub message_id: i64,
    pub to_member_id: i64,
    pub mid: i64,
}

/// A private message routed member-to-member through the bot.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PmMessage {
    pub id: i64,
    pub from_member_id: i64,
    pub to_member_id: i64,
    pub mid: i64,
    pub redirected_mid: i64,
    pub created_at: i64,
}

/// A directed (from -> to) PM deny-list entry.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PmBan {
    pub id: i64,
    pub from_member_id: i64,
    pub to_member_id: i64,
    pub created_at: i64,
}

/// Enumerated permission bits gating message/media/PM behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BanType {
    Message,
    Media,
    Sticker,
    Link,
    Receive,
    PmUser,
    PmAdmin,
}

impl BanType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Media => "media",
            Self::Sticker => "sticker",
            Self::Link => "link",
            Self::Receive => "receive",
            Self::PmUser => "pm_user",
            Self::PmAdmin => "pm_admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "message" => Self::Message,
            "media" => Self::Media,
            "sticker" => Self::Sticker,
            "link" => Self::Link,
            "receive" => Self::Receive,
            "pm_user" => Self::PmUser,
            "pm_admin" => Self::PmAdmin,
            _ => return None,
        })
    }

    /// Bit position within `Group::default_ban_mask`.
    pub fn bit(self) -> i64 {
        1 << match self {
            Self::Message => 0,
            Self::Media => 1,
            Self::Sticker => 2,
            Self::Link => 3,
            Self::Receive => 4,
            Self::PmUser => 5,
            Self::PmAdmin => 6,
        }
    }
}

/// A row in the ban matrix: a typed restriction scoped to a member, with an
/// optional expiry. Modeled as a collection of rows rather than flags on the
/// member so expiry semantics stay uniform.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Ban {
    pub id: i64,
    pub group_id: i64,
    pub member_id: Option<i64>,
    pub ban_type: String,
    pub expires_at: Option<i64>,
    pub created_at: i64,
}

impl Ban {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(ts) => ts <= now.timestamp(),
            None => false,
        }
    }
}
