//! Command and message handlers: the thin layer between a transport event
//! and the fan-out engine.

mod context;
mod mask;
mod messaging;
mod moderation;
mod pm;

pub use context::Context;
pub use mask::{change_mask, clear_pinned_mask, set_pinned_mask};
pub use messaging::receive_message;
pub use moderation::{
    ban_pm_sender, ban_target, delete_message, manage, pin_message, reveal, unban_target,
    unpin_message, MemberProfile,
};
pub use pm::send_pm;
