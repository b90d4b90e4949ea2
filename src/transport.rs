//! The one-to-one bot messaging transport boundary.
//!
//! The engine never speaks the wire protocol directly — it calls this trait
//! as a dependency it does not reimplement. A concrete implementation lives
//! outside this crate's scope; tests substitute a recording mock.

use crate::error::TransportError;
use async_trait::async_trait;

/// The primitives a group's bot endpoint exposes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a fresh copy of a message to `to_user_id`, optionally threaded as
    /// a reply to `reply_to_mid`. Returns the new message's transport id.
    async fn copy(
        &self,
        to_user_id: &str,
        content: &str,
        reply_to_mid: Option<i64>,
    ) -> Result<i64, TransportError>;

    /// Edit a previously sent message's text/caption in place.
    async fn edit_message_text(
        &self,
        to_user_id: &str,
        mid: i64,
        content: &str,
    ) -> Result<(), TransportError>;

    /// Delete a previously sent message.
    async fn delete_messages(&self, to_user_id: &str, mid: i64) -> Result<(), TransportError>;

    /// Pin a message in the recipient's private thread with the bot.
    async fn pin_chat_message(
        &self,
        to_user_id: &str,
        mid: i64,
        disable_notification: bool,
    ) -> Result<(), TransportError>;

    /// Unpin a message in the recipient's private thread with the bot.
    async fn unpin_chat_message(&self, to_user_id: &str, mid: i64) -> Result<(), TransportError>;
}
