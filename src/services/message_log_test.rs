use super::*;
use crate::state::test_helpers::{MemoryMessageLog, wait_for_rows};

#[test]
fn origin_maps_to_bot_flag() {
    assert!(Origin::Assistant.is_bot());
    assert!(!Origin::User.is_bot());
    assert_eq!(Origin::from_is_bot(true), Origin::Assistant);
    assert_eq!(Origin::from_is_bot(false), Origin::User);
}

#[test]
fn message_serializes_lowercase_origin() {
    let msg = Message::new("hi", Origin::User);
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["origin"], "user");
    assert_eq!(json["content"], "hi");
    assert!(json["timestamp"].as_i64().unwrap() > 0);
}

#[test]
fn new_messages_get_distinct_ids() {
    let a = Message::new("a", Origin::User);
    let b = Message::new("a", Origin::User);
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn writer_preserves_append_order() {
    let log = Arc::new(MemoryMessageLog::default());
    let (tx, handle) = spawn_message_writer(log.clone(), 8);

    let sent = (0..20)
        .map(|i| Message::new(format!("message {i}"), if i % 2 == 0 { Origin::User } else { Origin::Assistant }))
        .collect::<Vec<_>>();
    for msg in &sent {
        tx.send(PendingMessage { session_id: "s1".into(), message: msg.clone() })
            .await
            .unwrap();
    }
    drop(tx);
    handle.await.unwrap();

    let fetched = log.fetch("s1").await.unwrap();
    assert_eq!(fetched, sent);
}

#[tokio::test]
async fn fetch_is_scoped_to_session() {
    let log = Arc::new(MemoryMessageLog::default());
    let (tx, _handle) = spawn_message_writer(log.clone(), 8);

    enqueue(Some(&tx), "a", &Message::new("for a", Origin::User));
    enqueue(Some(&tx), "b", &Message::new("for b", Origin::User));
    wait_for_rows(&log, 2).await;

    let a = log.fetch("a").await.unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].content, "for a");
    assert!(log.fetch("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn writer_survives_store_failures() {
    let log = Arc::new(MemoryMessageLog::failing());
    let (tx, handle) = spawn_message_writer(log.clone(), 8);

    enqueue(Some(&tx), "s", &Message::new("lost", Origin::User));
    drop(tx);
    handle.await.unwrap();
    assert_eq!(log.len(), 0);
}

#[tokio::test]
async fn enqueue_without_queue_is_a_no_op() {
    enqueue(None, "s", &Message::new("nowhere", Origin::User));
}

#[tokio::test]
async fn enqueue_on_closed_queue_does_not_panic() {
    let (tx, rx) = mpsc::channel::<PendingMessage>(1);
    drop(rx);
    enqueue(Some(&tx), "s", &Message::new("closed", Origin::User));
}

#[tokio::test]
async fn enqueue_on_full_queue_drops() {
    let (tx, mut rx) = mpsc::channel::<PendingMessage>(1);
    enqueue(Some(&tx), "s", &Message::new("first", Origin::User));
    enqueue(Some(&tx), "s", &Message::new("second", Origin::User));
    let first = rx.recv().await.unwrap();
    assert_eq!(first.message.content, "first");
    assert!(rx.try_recv().is_err());
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn postgres_fetch_follows_insertion_order_not_timestamps() {
    let pool = crate::state::test_helpers::integration_pool().await;
    let log = PgMessageLog::new(pool);
    let session_id = Uuid::new_v4().to_string();

    // Client clock stepped backwards between the two messages.
    let mut first = Message::new("first", Origin::User);
    first.timestamp = 2_000;
    let mut second = Message::new("second", Origin::Assistant);
    second.timestamp = 1_000;

    log.append(&session_id, &first).await.expect("append should succeed");
    log.append(&session_id, &second).await.expect("append should succeed");

    let fetched = log.fetch(&session_id).await.expect("fetch should succeed");
    assert_eq!(fetched, vec![first, second]);
    assert!(log.fetch("no-such-session").await.expect("fetch should succeed").is_empty());
}
