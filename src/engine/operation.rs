//! The queued unit of fan-out work.
//!
//! Represented as a tagged variant: the worker `match`es on `kind` rather
//! than using dynamic dispatch per strategy.

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

/// Per-kind fields for a fan-out operation.
#[derive(Debug)]
pub enum OperationKind {
    Broadcast {
        /// The already-persisted original `Message` row.
        message_id: i64,
        originator_member_id: i64,
        mask: String,
        text: Option<String>,
        media_caption: Option<String>,
        /// The original message being replied to, if any.
        reply_to_message_id: Option<i64>,
    },
    Edit {
        message_id: i64,
        mask: String,
        text: String,
    },
    Delete {
        message_id: i64,
    },
    Pin {
        message_id: i64,
    },
    Unpin {
        message_id: i64,
    },
}

impl OperationKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Broadcast { .. } => "broadcast",
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "delete",
            Self::Pin { .. } => "pin",
            Self::Unpin { .. } => "unpin",
        }
    }
}

/// The result reported to a caller awaiting an operation's completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationOutcome {
    pub requests: u64,
    pub errors: u64,
    pub duration_ms: i64,
}

/// A queued operation plus its completion signal.
///
/// `done` is consumed exactly once by the worker: a `oneshot` is the natural
/// Rust fit for a single-fire completion signal.
pub struct Operation {
    pub group_id: i64,
    pub kind: OperationKind,
    pub created: DateTime<Utc>,
    pub done: oneshot::Sender<OperationOutcome>,
}

impl Operation {
    pub fn new(group_id: i64, kind: OperationKind) -> (Self, oneshot::Receiver<OperationOutcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                group_id,
                kind,
                created: Utc::now(),
                done: tx,
            },
            rx,
        )
    }
}
