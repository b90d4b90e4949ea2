//! Broadcast fan-out: happy path, threaded replies, blocked recipients.

mod common;

use common::{Call, Harness};
use maskrelay::engine::Role;

async fn seed_group(h: &Harness) -> (i64, i64, i64) {
    let creator = h.db.users().find_or_create("tg:creator", "Creator").await.unwrap();
    let group = h.db.groups().create("anonchat", "123:abc", creator.id).await.unwrap();
    let creator_member = h.db.members().join_or_get(creator.id, group.id).await.unwrap();
    h.db.members().set_role(creator_member.id, Role::Creator).await.unwrap();
    (group.id, creator.id, creator_member.id)
}

#[tokio::test]
async fn broadcast_reaches_every_other_member() {
    let h = Harness::new().await;
    let (group_id, _creator_uid, _creator_member_id) = seed_group(&h).await;
    let ctx = h.context(group_id);

    let bob = h.db.users().find_or_create("tg:bob", "Bob").await.unwrap();
    h.db.members().join_or_get(bob.id, group_id).await.unwrap();
    let carol = h.db.users().find_or_create("tg:carol", "Carol").await.unwrap();
    h.db.members().join_or_get(carol.id, group_id).await.unwrap();

    let outcome = maskrelay::handlers::receive_message(
        &ctx,
        "tg:creator",
        "Creator",
        1,
        Some("hello everyone"),
        None,
        None,
    )
    .await
    .unwrap();

    assert_eq!(outcome.requests, 2);
    assert_eq!(outcome.errors, 0);
    assert_eq!(h.transport.copy_count(), 2);

    for call in h.transport.calls() {
        match call {
            Call::Copy { to, content, .. } => {
                assert!(to == "tg:bob" || to == "tg:carol");
                assert!(content.contains("hello everyone"));
                assert!(content.contains('|'));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }
}

#[tokio::test]
async fn threaded_reply_carries_the_right_mid() {
    let h = Harness::new().await;
    let (group_id, _creator_uid, _creator_member_id) = seed_group(&h).await;
    let ctx = h.context(group_id);

    let bob = h.db.users().find_or_create("tg:bob", "Bob").await.unwrap();
    h.db.members().join_or_get(bob.id, group_id).await.unwrap();

    maskrelay::handlers::receive_message(&ctx, "tg:creator", "Creator", 1, Some("first"), None, None)
        .await
        .unwrap();

    let outcome = maskrelay::handlers::receive_message(
        &ctx,
        "tg:creator",
        "Creator",
        2,
        Some("a reply"),
        None,
        Some(1),
    )
    .await
    .unwrap();

    assert_eq!(outcome.requests, 1);
    let calls = h.transport.calls();
    let reply_call = calls
        .iter()
        .find(|c| matches!(c, Call::Copy { content, .. } if content.contains("a reply")))
        .unwrap();
    match reply_call {
        Call::Copy { reply_to_mid, .. } => assert!(reply_to_mid.is_some()),
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn blocked_recipient_transitions_to_left_and_counts_as_error() {
    let h = Harness::new().await;
    let (group_id, _creator_uid, _creator_member_id) = seed_group(&h).await;
    let ctx = h.context(group_id);

    let bob = h.db.users().find_or_create("tg:bob", "Bob").await.unwrap();
    let bob_member = h.db.members().join_or_get(bob.id, group_id).await.unwrap();
    h.transport.block("tg:bob");

    let outcome = maskrelay::handlers::receive_message(
        &ctx,
        "tg:creator",
        "Creator",
        1,
        Some("hi"),
        None,
        None,
    )
    .await
    .unwrap();

    assert_eq!(outcome.requests, 1);
    assert_eq!(outcome.errors, 1);

    let reloaded = h.db.members().find_by_id(bob_member.id).await.unwrap();
    assert_eq!(reloaded.role(), Role::Left);
}

#[tokio::test]
async fn mask_exhaustion_surfaces_as_operation_error() {
    let h = Harness::new().await;
    let (group_id, _creator_uid, _creator_member_id) = seed_group(&h).await;
    let ctx = h.context(group_id);

    // Drain the pool to a single candidate by pre-assigning it to another member.
    let pool = h.registry.mask_pool(group_id);
    let universe = maskrelay::config::EngineConfig::default().mask_universe;
    for (i, _) in universe.iter().enumerate() {
        pool.get_mask(1000 + i as i64, None, false, chrono::Utc::now()).unwrap();
    }

    let err = maskrelay::handlers::receive_message(
        &ctx,
        "tg:creator",
        "Creator",
        1,
        Some("hi"),
        None,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, maskrelay::error::OperationError::MaskNotAvailable));
}
