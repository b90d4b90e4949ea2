//! `/delete`, `/ban`, `/unban`, `/pin`, `/unpin`, `/reveal`, `/manage`.

use super::context::Context;
use crate::db::Member;
use crate::engine::operation::{OperationKind, OperationOutcome};
use crate::engine::{message_map, permissions, Role};
use crate::error::{OperationError, OperationResult};

/// `/delete` (reply) — the author may delete their own message; members with
/// `ADMIN_BAN`+ may delete anyone's.
pub async fn delete_message(
    ctx: &Context,
    actor_member_id: i64,
    message_id: i64,
) -> OperationResult<OperationOutcome> {
    let actor = find_member(ctx, actor_member_id).await?;
    let message = ctx
        .db
        .messages()
        .find_by_id(message_id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    if message.member_id != actor.id && actor.role() < Role::AdminBan {
        return Err(OperationError::msg("Only messages sent by you can be deleted."));
    }

    let rx = ctx
        .registry
        .enqueue(ctx.group_id, OperationKind::Delete { message_id })
        .map_err(|e| OperationError::msg(e.to_string()))?;

    ctx.registry.wait_for(rx).await.map_err(|e| OperationError::msg(e.to_string()))
}

/// `/pin` (reply) — requires `ADMIN_MSG`+.
pub async fn pin_message(
    ctx: &Context,
    actor_member_id: i64,
    message_id: i64,
) -> OperationResult<OperationOutcome> {
    let actor = find_member(ctx, actor_member_id).await?;
    permissions::validate_role(&actor, Role::AdminMsg)?;

    let rx = ctx
        .registry
        .enqueue(ctx.group_id, OperationKind::Pin { message_id })
        .map_err(|e| OperationError::msg(e.to_string()))?;

    ctx.registry.wait_for(rx).await.map_err(|e| OperationError::msg(e.to_string()))
}

/// `/unpin` (reply) — requires `ADMIN_MSG`+.
pub async fn unpin_message(
    ctx: &Context,
    actor_member_id: i64,
    message_id: i64,
) -> OperationResult<OperationOutcome> {
    let actor = find_member(ctx, actor_member_id).await?;
    permissions::validate_role(&actor, Role::AdminMsg)?;

    let rx = ctx
        .registry
        .enqueue(ctx.group_id, OperationKind::Unpin { message_id })
        .map_err(|e| OperationError::msg(e.to_string()))?;

    ctx.registry.wait_for(rx).await.map_err(|e| OperationError::msg(e.to_string()))
}

/// `/ban <uid>` or `/ban` (reply) — transitions the target to `BANNED`,
/// evicting their live mask. Replying to a PM instead records a `PMBan`
/// (spec: "reply to a PM message creates a PMBan instead").
pub async fn ban_target(ctx: &Context, actor_member_id: i64, target_member_id: i64) -> OperationResult<()> {
    let actor = find_member(ctx, actor_member_id).await?;
    permissions::validate_role(&actor, Role::AdminBan)?;
    let target = find_member(ctx, target_member_id).await?;
    permissions::validate_escalation(&actor, &target)?;

    ctx.db
        .members()
        .set_role(target.id, Role::Banned)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;
    ctx.registry.mask_pool(ctx.group_id).release(target.id);

    Ok(())
}

/// `/unban <uid>` or `/unban` (reply) — returns the target to `GUEST`, not
/// their role prior to the ban. This is deliberate: there is no role history
/// to restore from.
pub async fn unban_target(ctx: &Context, actor_member_id: i64, target_member_id: i64) -> OperationResult<()> {
    let actor = find_member(ctx, actor_member_id).await?;
    permissions::validate_role(&actor, Role::AdminBan)?;
    let target = find_member(ctx, target_member_id).await?;
    permissions::validate_escalation(&actor, &target)?;

    ctx.db
        .members()
        .set_role(target.id, Role::Guest)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    Ok(())
}

/// `/ban` (reply to a PM) — record a directed PMBan instead of a role ban.
pub async fn ban_pm_sender(ctx: &Context, actor_member_id: i64, reply_to_mid: i64) -> OperationResult<()> {
    let target = match message_map::resolve_reply_target(&ctx.db.messages(), actor_member_id, reply_to_mid, true)
        .await?
    {
        message_map::ReplyTarget::Pm(pm) => pm.from_member_id,
        _ => return Err(OperationError::msg("not a private message")),
    };

    ctx.db
        .messages()
        .set_pm_ban(target, actor_member_id, true)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))
}

/// Snapshot shown by `/reveal` and `/manage` — no menu rendering here, that
/// surface belongs to the transport layer, not this crate.
#[derive(Debug, Clone)]
pub struct MemberProfile {
    pub member_id: i64,
    pub transport_uid: String,
    pub display_name: String,
    pub role: Role,
    pub n_messages: i64,
    pub created_at: i64,
}

/// `/reveal` (reply) — requires `ADMIN_BAN`+.
pub async fn reveal(ctx: &Context, actor_member_id: i64, message_id: i64) -> OperationResult<MemberProfile> {
    let actor = find_member(ctx, actor_member_id).await?;
    permissions::validate_role(&actor, Role::AdminBan)?;
    target_profile(ctx, message_id).await
}

/// `/manage` (reply) — requires `ADMIN_BAN`+; same underlying data as
/// `/reveal`, presentation (menu) is left to the caller.
pub async fn manage(ctx: &Context, actor_member_id: i64, message_id: i64) -> OperationResult<MemberProfile> {
    let actor = find_member(ctx, actor_member_id).await?;
    permissions::validate_role(&actor, Role::AdminBan)?;
    target_profile(ctx, message_id).await
}

async fn target_profile(ctx: &Context, message_id: i64) -> OperationResult<MemberProfile> {
    let message = ctx
        .db
        .messages()
        .find_by_id(message_id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;
    let member = find_member(ctx, message.member_id).await?;
    let user = ctx
        .db
        .users()
        .find_by_id(member.user_id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    Ok(MemberProfile {
        member_id: member.id,
        transport_uid: user.transport_uid,
        display_name: user.display_name,
        role: member.role(),
        n_messages: member.n_messages,
        created_at: member.created_at,
    })
}

async fn find_member(ctx: &Context, member_id: i64) -> OperationResult<Member> {
    ctx.db.members().find_by_id(member_id).await.map_err(|e| OperationError::msg(e.to_string()))
}
