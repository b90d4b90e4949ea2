//! Per-operation-kind fan-out strategies.
//!
//! Each strategy iterates a pre-op recipient snapshot and performs one
//! transport call per recipient. Recipient iteration is a plain sequential
//! loop, not a parallel fan-out — the transport's rate limit and the need
//! for deterministic error accounting preclude running calls concurrently.

mod broadcast;
mod delete;
mod edit;
mod pin;

pub use broadcast::dispatch_broadcast;
pub use delete::dispatch_delete;
pub use edit::dispatch_edit;
pub use pin::{dispatch_pin, dispatch_unpin};

use crate::db::{BanType, Database, Group, Member};
use crate::engine::permissions::{check_ban, is_fanout_eligible};

/// The snapshot of recipients eligible for broadcast/edit/delete: active,
/// non-banned members other than `exclude_member_id`, filtered further by
/// per-recipient RECEIVE bans.
async fn recipients_excluding_receive_banned(
    db: &Database,
    group: &Group,
    exclude_member_id: Option<i64>,
) -> Vec<Member> {
    let all = db.members().list_active(group.id).await.unwrap_or_default();
    let mut result = Vec::with_capacity(all.len());
    for member in all {
        if Some(member.id) == exclude_member_id || !is_fanout_eligible(&member) {
            continue;
        }
        let receive_banned = check_ban(&db.bans(), group, &member, BanType::Receive, true)
            .await
            .unwrap_or(false);
        if !receive_banned {
            result.push(member);
        }
    }
    result
}

/// The snapshot of recipients for pin/unpin: active, non-banned members,
/// deliberately *not* filtered by RECEIVE — pin/unpin only checks role
/// eligibility, not the RECEIVE mask.
async fn recipients_for_pin(db: &Database, group: &Group) -> Vec<Member> {
    db.members()
        .list_active(group.id)
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(is_fanout_eligible)
        .collect()
}
