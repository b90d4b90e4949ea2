//! Reply resolution: mapping an incoming reply's transport mid back to the
//! anonymous message it targets.

use crate::db::{Message, MessageRepository, PmMessage};
use crate::error::{OperationError, OperationResult};

/// What a reply mid resolved to.
#[derive(Debug)]
pub enum ReplyTarget {
    /// The replying member's own original message.
    Own(Message),
    /// A redirected copy, resolved back to the underlying original message.
    Redirected(Message),
    /// A private message thread.
    Pm(PmMessage),
}

/// Resolve a reply in `member_id`'s private thread with the bot to the
/// anonymous message it targets, trying in order: the member's own message,
/// a redirected copy of someone else's message, and (if `allow_pm`) a PM.
pub async fn resolve_reply_target(
    messages: &MessageRepository<'_>,
    member_id: i64,
    mid: i64,
    allow_pm: bool,
) -> OperationResult<ReplyTarget> {
    if let Some(message) = messages
        .find_by_member_mid(member_id, mid)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?
    {
        return Ok(ReplyTarget::Own(message));
    }

    if let Some(redirect) = messages
        .find_redirected(member_id, mid)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?
    {
        let original = messages
            .find_by_id(redirect.message_id)
            .await
            .map_err(|e| OperationError::msg(e.to_string()))?;
        return Ok(ReplyTarget::Redirected(original));
    }

    if allow_pm
        && let Some(pm) = messages
            .find_pm_by_redirected_mid(member_id, mid)
            .await
            .map_err(|e| OperationError::msg(e.to_string()))?
    {
        return Ok(ReplyTarget::Pm(pm));
    }

    Err(OperationError::NotAnAnonymousMessage)
}
