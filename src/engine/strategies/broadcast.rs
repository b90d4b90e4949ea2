//! Broadcast strategy: fan a new message out to every eligible recipient.

use super::recipients_excluding_receive_banned;
use crate::db::{Database, Group};
use crate::engine::operation::OperationOutcome;
use crate::engine::Role;
use crate::error::TransportError;
use crate::transport::Transport;
use tracing::warn;

fn compose_content(mask: &str, text: Option<&str>, media_caption: Option<&str>) -> String {
    match text {
        Some(text) => format!("{mask} | {text}"),
        None => match media_caption {
            Some(caption) if !caption.is_empty() => format!("{mask} | {caption}"),
            _ => format!("{mask} has sent a media."),
        },
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn dispatch_broadcast(
    db: &Database,
    transport: &dyn Transport,
    group: &Group,
    message_id: i64,
    originator_member_id: i64,
    mask: &str,
    text: Option<&str>,
    media_caption: Option<&str>,
    reply_to_message_id: Option<i64>,
) -> OperationOutcome {
    let content = compose_content(mask, text, media_caption);
    let recipients = recipients_excluding_receive_banned(db, group, Some(originator_member_id)).await;

    let mut outcome = OperationOutcome::default();

    for recipient in recipients {
        outcome.requests += 1;

        let reply_to_mid = if let Some(reply_to) = reply_to_message_id {
            match db.messages().find_redirected_by_message(reply_to, recipient.id).await {
                Ok(redirect) => redirect.map(|r| r.mid),
                Err(e) => {
                    warn!(group_id = group.id, error = %e, "failed to resolve reply target");
                    None
                }
            }
        } else {
            None
        };

        let user = match db.users().find_by_id(recipient.user_id).await {
            Ok(user) => user,
            Err(e) => {
                outcome.errors += 1;
                warn!(group_id = group.id, error = %e, "recipient user lookup failed");
                continue;
            }
        };

        match transport.copy(&user.transport_uid, &content, reply_to_mid).await {
            Ok(mid) => {
                if let Err(e) = db.messages().record_redirected(message_id, recipient.id, mid).await {
                    warn!(group_id = group.id, error = %e, "failed to persist redirected message");
                }
            }
            Err(TransportError::UserIsBlocked) => {
                outcome.errors += 1;
                if recipient.role() != Role::Creator
                    && let Err(e) = db.members().set_role(recipient.id, Role::Left).await
                {
                    warn!(group_id = group.id, error = %e, "failed to transition blocked member to LEFT");
                }
            }
            Err(e) => {
                outcome.errors += 1;
                warn!(group_id = group.id, operation = "broadcast", error = %e, "transport call failed");
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_text_prefix() {
        assert_eq!(compose_content("🐶", Some("hi"), None), "🐶 | hi");
    }

    #[test]
    fn composes_media_caption() {
        assert_eq!(compose_content("🐶", None, Some("nice")), "🐶 | nice");
        assert_eq!(compose_content("🐶", None, None), "🐶 has sent a media.");
    }
}
