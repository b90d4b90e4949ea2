//! Pin/unpin strategy.
//!
//! Unlike broadcast/edit/delete, this does not skip RECEIVE-banned members —
//! only members with the group-kicked `BANNED` role are excluded. Pin state
//! is a low-churn action admins need to force even for receive-muted members.

use super::recipients_for_pin;
use crate::db::Database;
use crate::engine::operation::OperationOutcome;
use tracing::warn;

async fn dispatch(
    db: &Database,
    transport: &dyn crate::transport::Transport,
    group: &crate::db::Group,
    message_id: i64,
    unpin: bool,
) -> OperationOutcome {
    let mut outcome = OperationOutcome::default();

    let original = match db.messages().find_by_id(message_id).await {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "pin: original message not found");
            return outcome;
        }
    };

    for recipient in recipients_for_pin(db, group).await {
        outcome.requests += 1;

        let mid = if recipient.id == original.member_id {
            Some(original.mid)
        } else {
            match db.messages().find_redirected_by_message(message_id, recipient.id).await {
                Ok(redirect) => redirect.map(|r| r.mid),
                Err(e) => {
                    outcome.errors += 1;
                    warn!(error = %e, "redirect lookup failed during pin");
                    continue;
                }
            }
        };

        let Some(mid) = mid else { continue };

        let user = match db.users().find_by_id(recipient.user_id).await {
            Ok(user) => user,
            Err(e) => {
                outcome.errors += 1;
                warn!(error = %e, "recipient user lookup failed during pin");
                continue;
            }
        };

        let result = if unpin {
            transport.unpin_chat_message(&user.transport_uid, mid).await
        } else {
            transport.pin_chat_message(&user.transport_uid, mid, true).await
        };

        if let Err(e) = result {
            outcome.errors += 1;
            warn!(error = %e, "transport call failed during pin/unpin");
        }
    }

    outcome
}

pub async fn dispatch_pin(
    db: &Database,
    transport: &dyn crate::transport::Transport,
    group: &crate::db::Group,
    message_id: i64,
) -> OperationOutcome {
    dispatch(db, transport, group, message_id, false).await
}

pub async fn dispatch_unpin(
    db: &Database,
    transport: &dyn crate::transport::Transport,
    group: &crate::db::Group,
    message_id: i64,
) -> OperationOutcome {
    dispatch(db, transport, group, message_id, true).await
}
