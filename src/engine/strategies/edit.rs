//! Edit strategy: push updated content to every recipient who already has a
//! redirected copy. A missing redirect is not an error — that recipient was
//! never delivered to (e.g. they joined after the original send).

use super::recipients_excluding_receive_banned;
use crate::db::{Database, Group};
use crate::engine::operation::OperationOutcome;
use tracing::warn;

pub async fn dispatch_edit(
    db: &Database,
    transport: &dyn crate::transport::Transport,
    group: &Group,
    message_id: i64,
    mask: &str,
    text: &str,
) -> OperationOutcome {
    let content = format!("{mask} | {text}");
    let recipients = recipients_excluding_receive_banned(db, group, None).await;

    let mut outcome = OperationOutcome::default();

    for recipient in recipients {
        outcome.requests += 1;

        let redirect = match db.messages().find_redirected_by_message(message_id, recipient.id).await {
            Ok(Some(r)) => r,
            Ok(None) => continue,
            Err(e) => {
                outcome.errors += 1;
                warn!(group_id = group.id, error = %e, "redirect lookup failed during edit");
                continue;
            }
        };

        let user = match db.users().find_by_id(recipient.user_id).await {
            Ok(user) => user,
            Err(e) => {
                outcome.errors += 1;
                warn!(group_id = group.id, error = %e, "recipient user lookup failed");
                continue;
            }
        };

        if let Err(e) = transport.edit_message_text(&user.transport_uid, redirect.mid, &content).await {
            outcome.errors += 1;
            warn!(group_id = group.id, operation = "edit", error = %e, "transport call failed");
        }
    }

    outcome
}
