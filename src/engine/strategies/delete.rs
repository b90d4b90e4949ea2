//! Delete strategy: remove the original message from the sender's private
//! chat and every recipient's redirected copy.

use crate::db::Database;
use crate::engine::operation::OperationOutcome;
use tracing::warn;

pub async fn dispatch_delete(
    db: &Database,
    transport: &dyn crate::transport::Transport,
    message_id: i64,
) -> OperationOutcome {
    let mut outcome = OperationOutcome::default();

    let original = match db.messages().find_by_id(message_id).await {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "delete: original message not found");
            return outcome;
        }
    };

    outcome.requests += 1;
    match db.members().find_by_id(original.member_id).await {
        Ok(sender) => match db.users().find_by_id(sender.user_id).await {
            Ok(user) => {
                if let Err(e) = transport.delete_messages(&user.transport_uid, original.mid).await {
                    outcome.errors += 1;
                    warn!(error = %e, "failed to delete sender's own copy");
                }
            }
            Err(e) => {
                outcome.errors += 1;
                warn!(error = %e, "sender user lookup failed during delete");
            }
        },
        Err(e) => {
            outcome.errors += 1;
            warn!(error = %e, "sender member lookup failed during delete");
        }
    }

    let redirects = db.messages().list_redirected_for_message(message_id).await.unwrap_or_default();

    for redirect in redirects {
        outcome.requests += 1;

        let recipient = match db.members().find_by_id(redirect.to_member_id).await {
            Ok(member) => member,
            Err(e) => {
                outcome.errors += 1;
                warn!(error = %e, "recipient member lookup failed during delete");
                continue;
            }
        };

        let user = match db.users().find_by_id(recipient.user_id).await {
            Ok(user) => user,
            Err(e) => {
                outcome.errors += 1;
                warn!(error = %e, "recipient user lookup failed during delete");
                continue;
            }
        };

        if let Err(e) = transport.delete_messages(&user.transport_uid, redirect.mid).await {
            outcome.errors += 1;
            warn!(error = %e, "failed to delete recipient's copy");
        }
    }

    outcome
}
