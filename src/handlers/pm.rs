//! `/pm <text>` — private message to a message's author, routed through the
//! bot with a `(👁️ PM)` marker. Point-to-point, so it bypasses the group's
//! fan-out queue entirely (there is exactly one recipient and no ordering
//! concern relative to broadcast/edit/delete on other messages).

use super::context::Context;
use crate::db::BanType;
use crate::engine::{message_map, permissions};
use crate::error::{OperationError, OperationResult};

pub async fn send_pm(
    ctx: &Context,
    from_member_id: i64,
    reply_to_mid: i64,
    own_incoming_mid: i64,
    text: &str,
) -> OperationResult<()> {
    let group = ctx.group().await?;

    let target = message_map::resolve_reply_target(&ctx.db.messages(), from_member_id, reply_to_mid, true)
        .await?;

    let to_member_id = match target {
        message_map::ReplyTarget::Own(_) => {
            return Err(OperationError::msg("you cannot PM yourself"));
        }
        message_map::ReplyTarget::Redirected(message) => message.member_id,
        message_map::ReplyTarget::Pm(pm) => pm.from_member_id,
    };

    if to_member_id == from_member_id {
        return Err(OperationError::msg("you cannot PM yourself"));
    }

    let from_member = ctx
        .db
        .members()
        .find_by_id(from_member_id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;
    let to_member = ctx
        .db
        .members()
        .find_by_id(to_member_id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    permissions::require_not_banned(&ctx.db.bans(), &group, &from_member, BanType::PmUser, true).await?;
    if to_member.role() >= crate::engine::Role::AdminMsg {
        permissions::require_not_banned(&ctx.db.bans(), &group, &from_member, BanType::PmAdmin, true).await?;
    }

    if ctx
        .db
        .messages()
        .is_pm_banned(to_member_id, from_member_id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?
    {
        return Err(OperationError::PermissionDenied);
    }

    let to_user = ctx
        .db
        .users()
        .find_by_id(to_member.user_id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    let content = format!("(👁️ PM) {text}");
    let redirected_mid = ctx
        .transport
        .copy(&to_user.transport_uid, &content, None)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    ctx.db
        .messages()
        .record_pm(from_member_id, to_member_id, own_incoming_mid, redirected_mid)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    Ok(())
}
