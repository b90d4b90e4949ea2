//! The member role lattice.
//!
//! Encoded as a comparable ordinal rather than a set of string tags, so every
//! permission check is a plain `actor.role >= required` comparison.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Role {
    Left = 0,
    Banned = 1,
    Guest = 2,
    Member = 3,
    AdminMsg = 4,
    AdminBan = 5,
    AdminAdmin = 6,
    Admin = 7,
    Creator = 8,
}

impl Role {
    pub fn from_i32(v: i32) -> Option<Self> {
        Some(match v {
            0 => Self::Left,
            1 => Self::Banned,
            2 => Self::Guest,
            3 => Self::Member,
            4 => Self::AdminMsg,
            5 => Self::AdminBan,
            6 => Self::AdminAdmin,
            7 => Self::Admin,
            8 => Self::Creator,
            _ => return None,
        })
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Human-readable label, used by `/reveal`.
    pub fn display(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Banned => "banned",
            Self::Guest => "guest",
            Self::Member => "member",
            Self::AdminMsg => "message admin",
            Self::AdminBan => "ban admin",
            Self::AdminAdmin => "admin admin",
            Self::Admin => "admin",
            Self::Creator => "creator",
        }
    }
}
