//! Message-receive handler: the golden path that turns a member's message
//! into a Broadcast operation.

use super::context::Context;
use crate::db::BanType;
use crate::engine::operation::{OperationKind, OperationOutcome};
use crate::engine::{message_map, permissions};
use crate::error::{OperationError, OperationResult};
use chrono::Utc;

#[allow(clippy::too_many_arguments)]
pub async fn receive_message(
    ctx: &Context,
    sender_transport_uid: &str,
    sender_display_name: &str,
    incoming_mid: i64,
    text: Option<&str>,
    media_caption: Option<&str>,
    reply_to_mid: Option<i64>,
) -> OperationResult<OperationOutcome> {
    let group = ctx.group().await?;
    if group.disabled {
        return Err(OperationError::GroupDisabled);
    }

    let member = ctx.actor(sender_transport_uid, sender_display_name).await?;

    permissions::require_not_banned(&ctx.db.bans(), &group, &member, BanType::Message, true).await?;
    if media_caption.is_some() {
        permissions::require_not_banned(&ctx.db.bans(), &group, &member, BanType::Media, true).await?;
    }

    let pool = ctx.registry.mask_pool(group.id);
    let (_, mask) = pool.get_mask(member.id, member.pinned_mask.as_deref(), false, Utc::now())?;
    ctx.db
        .members()
        .set_last_mask(member.id, &mask)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    let reply_to_message_id = match reply_to_mid {
        Some(mid) => match message_map::resolve_reply_target(&ctx.db.messages(), member.id, mid, false).await {
            Ok(message_map::ReplyTarget::Own(m)) => Some(m.id),
            Ok(message_map::ReplyTarget::Redirected(m)) => Some(m.id),
            Ok(message_map::ReplyTarget::Pm(_)) | Err(_) => None,
        },
        None => None,
    };

    let original = ctx
        .db
        .messages()
        .record_original(member.id, group.id, &mask, incoming_mid, reply_to_message_id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    let rx = ctx
        .registry
        .enqueue(
            group.id,
            OperationKind::Broadcast {
                message_id: original.id,
                originator_member_id: member.id,
                mask,
                text: text.map(str::to_string),
                media_caption: media_caption.map(str::to_string),
                reply_to_message_id,
            },
        )
        .map_err(|e| OperationError::msg(e.to_string()))?;

    let outcome = ctx.registry.wait_for(rx).await.map_err(|e| OperationError::msg(e.to_string()))?;

    ctx.db
        .members()
        .touch_activity(member.id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;
    ctx.db
        .groups()
        .increment_n_messages(group.id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    Ok(outcome)
}
