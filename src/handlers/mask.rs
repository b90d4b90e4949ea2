//! `/change` and `/setmask` — mask pool commands.

use super::context::Context;
use crate::error::{OperationError, OperationResult};
use chrono::Utc;

/// `/change` — force a fresh mask allocation. A pinned mask must be cleared
/// first; renewing past a pin would silently defeat the point of pinning.
pub async fn change_mask(ctx: &Context, member_id: i64) -> OperationResult<String> {
    let member = ctx
        .db
        .members()
        .find_by_id(member_id)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    if member.pinned_mask.is_some() {
        return Err(OperationError::msg("clear your pinned mask with /setmask first"));
    }

    let pool = ctx.registry.mask_pool(ctx.group_id);
    let (_, mask) = pool.get_mask(member.id, None, true, Utc::now())?;

    ctx.db
        .members()
        .set_last_mask(member.id, &mask)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    Ok(mask)
}

/// `/setmask <emoji>` — pin a mask, bypassing rotation on every future
/// `get_mask` call until cleared.
pub async fn set_pinned_mask(ctx: &Context, member_id: i64, mask: &str) -> OperationResult<()> {
    if mask.trim().is_empty() {
        return Err(OperationError::msg("mask must not be empty"));
    }

    ctx.db
        .members()
        .set_pinned_mask(member_id, Some(mask))
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?;

    Ok(())
}

/// `/setmask` with no argument clears the pin, returning to pool rotation.
pub async fn clear_pinned_mask(ctx: &Context, member_id: i64) -> OperationResult<()> {
    ctx.db
        .members()
        .set_pinned_mask(member_id, None)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))
}
