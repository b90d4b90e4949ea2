//! `/change` and `/setmask` mask-pool commands, and `/pm` point-to-point
//! delivery.

mod common;

use common::Harness;
use maskrelay::error::OperationError;

async fn seed_group(h: &Harness) -> i64 {
    let creator = h.db.users().find_or_create("tg:creator", "Creator").await.unwrap();
    let group = h.db.groups().create("anonchat", "123:abc", creator.id).await.unwrap();
    h.db.members().join_or_get(creator.id, group.id).await.unwrap();
    group.id
}

#[tokio::test]
async fn setmask_then_change_is_rejected_until_cleared() {
    let h = Harness::new().await;
    let group_id = seed_group(&h).await;
    let ctx = h.context(group_id);

    let alice = h.db.users().find_or_create("tg:alice", "Alice").await.unwrap();
    let member = h.db.members().join_or_get(alice.id, group_id).await.unwrap();

    maskrelay::handlers::set_pinned_mask(&ctx, member.id, "🦊").await.unwrap();

    let err = maskrelay::handlers::change_mask(&ctx, member.id).await.unwrap_err();
    assert!(matches!(err, OperationError::Message(_)));

    maskrelay::handlers::clear_pinned_mask(&ctx, member.id).await.unwrap();
    let mask = maskrelay::handlers::change_mask(&ctx, member.id).await.unwrap();
    assert!(!mask.is_empty());
}

#[tokio::test]
async fn pm_reaches_the_original_authors_own_thread() {
    let h = Harness::new().await;
    let group_id = seed_group(&h).await;
    let ctx = h.context(group_id);

    let bob = h.db.users().find_or_create("tg:bob", "Bob").await.unwrap();
    let bob_member = h.db.members().join_or_get(bob.id, group_id).await.unwrap();

    let alice = h.db.users().find_or_create("tg:alice", "Alice").await.unwrap();
    let alice_member = h.db.members().join_or_get(alice.id, group_id).await.unwrap();

    let original = h.db.messages().record_original(bob_member.id, group_id, "🐶", 50, None).await.unwrap();
    h.db.messages().record_redirected(original.id, alice_member.id, 500).await.unwrap();

    maskrelay::handlers::send_pm(&ctx, alice_member.id, 500, 600, "nice point").await.unwrap();

    let calls = h.transport.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        common::Call::Copy { to, content, .. } => {
            assert_eq!(to, "tg:bob");
            assert!(content.contains("nice point"));
            assert!(content.contains("PM"));
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn pm_to_self_is_rejected() {
    let h = Harness::new().await;
    let group_id = seed_group(&h).await;
    let ctx = h.context(group_id);

    let alice = h.db.users().find_or_create("tg:alice", "Alice").await.unwrap();
    let alice_member = h.db.members().join_or_get(alice.id, group_id).await.unwrap();

    let original = h.db.messages().record_original(alice_member.id, group_id, "🐶", 50, None).await.unwrap();
    h.db.messages().record_redirected(original.id, alice_member.id, 500).await.unwrap();

    let err = maskrelay::handlers::send_pm(&ctx, alice_member.id, 500, 600, "hi me").await.unwrap_err();
    assert!(matches!(err, OperationError::Message(_)));
}
