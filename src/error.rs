//! Unified error handling for maskrelay.
//!
//! This module provides a centralized error hierarchy for the fan-out
//! engine, with automatic conversions and metric labeling.

use thiserror::Error;

/// User-visible domain error raised by command handlers and engine
/// operations. Handlers report the message to the user and typically delete
/// the originating command.
#[derive(Debug, Clone, Error)]
pub enum OperationError {
    #[error("{0}")]
    Message(String),

    #[error("no mask currently available")]
    MaskNotAvailable,

    #[error("permission denied")]
    PermissionDenied,

    #[error("this is not an anonymous message or is outdated")]
    NotAnAnonymousMessage,

    #[error("member not found in this group")]
    MemberNotFound,

    #[error("group is disabled")]
    GroupDisabled,
}

impl OperationError {
    /// Construct a freeform message error.
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Message(s.into())
    }

    /// Get a static error code string for metrics labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::MaskNotAvailable => "mask_not_available",
            Self::PermissionDenied => "permission_denied",
            Self::NotAnAnonymousMessage => "not_anonymous_message",
            Self::MemberNotFound => "member_not_found",
            Self::GroupDisabled => "group_disabled",
        }
    }
}

/// Result type for command handlers.
pub type OperationResult<T> = Result<T, OperationError>;

/// Errors raised by the transport boundary (the one-to-one bot messaging
/// client). `UserIsBlocked` is distinguished because it triggers a
/// Member -> LEFT role transition; every other variant is counted as a
/// fan-out error and the operation continues.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("user has blocked the bot")]
    UserIsBlocked,

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserIsBlocked => "user_is_blocked",
            Self::Other(_) => "other",
        }
    }
}

/// Errors internal to the engine's bookkeeping (not user-visible).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("group {0} has no running worker")]
    GroupNotRunning(i64),

    #[error("operation timed out waiting for completion")]
    Timeout,

    #[error(transparent)]
    Db(#[from] crate::db::DbError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_error_codes() {
        assert_eq!(OperationError::MaskNotAvailable.error_code(), "mask_not_available");
        assert_eq!(OperationError::msg("x").error_code(), "message");
    }

    #[test]
    fn transport_error_codes() {
        assert_eq!(TransportError::UserIsBlocked.error_code(), "user_is_blocked");
    }
}
