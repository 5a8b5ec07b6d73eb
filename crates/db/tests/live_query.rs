//! Live queries over the in-process store.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::{json, Value};

use beatstore_db::{Direction, DocumentStore, Fields, LiveQuery, MemoryDocumentStore, Query};

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => panic!("object expected"),
    }
}

fn store() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryDocumentStore::new())
}

#[tokio::test]
async fn initial_snapshot_then_updates() {
    let store = store();
    store
        .insert("beats", fields(json!({ "status": "published", "title": "a" })))
        .await
        .unwrap();

    let query = Query::new()
        .where_eq("status", "published")
        .order_by("createdAt", Direction::Asc);
    let mut sub = LiveQuery::new("beats", query).start(store.clone()).await.unwrap();
    assert_eq!(sub.current().documents.len(), 1);
    assert_eq!(sub.current().sequence, 0);

    store
        .insert("beats", fields(json!({ "status": "published", "title": "b" })))
        .await
        .unwrap();
    let snapshot = tokio::time::timeout(Duration::from_secs(2), sub.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.documents.len(), 2);
}

#[tokio::test]
async fn other_collections_do_not_trigger_refresh() {
    let store = store();
    let mut sub = LiveQuery::new("beats", Query::new()).start(store.clone()).await.unwrap();
    store.insert("orders", Fields::new()).await.unwrap();
    let waited = tokio::time::timeout(Duration::from_millis(100), sub.changed()).await;
    assert!(waited.is_err());
}

#[tokio::test]
async fn latest_snapshot_wins() {
    let store = store();
    let mut sub = LiveQuery::new("beats", Query::new()).start(store.clone()).await.unwrap();
    for _ in 0..20 {
        store.insert("beats", Fields::new()).await.unwrap();
    }
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let snapshot = tokio::time::timeout_at(deadline, sub.changed())
            .await
            .unwrap()
            .unwrap();
        if snapshot.documents.len() == 20 {
            break;
        }
    }
}

#[tokio::test]
async fn filter_narrows_results() {
    let store = store();
    store.insert("beats", fields(json!({ "plays": 1 }))).await.unwrap();
    store.insert("beats", fields(json!({ "plays": 9 }))).await.unwrap();
    let sub = LiveQuery::new("beats", Query::new())
        .filter(|doc| doc.data.get("plays").and_then(Value::as_u64).unwrap_or(0) > 5)
        .start(store.clone())
        .await
        .unwrap();
    assert_eq!(sub.current().documents.len(), 1);
}

#[tokio::test]
async fn cancelled_subscription_stops_delivering() {
    let store = store();
    let mut sub = LiveQuery::new("beats", Query::new()).start(store.clone()).await.unwrap();
    sub.cancel();
    assert!(sub.is_cancelled());
    store.insert("beats", Fields::new()).await.unwrap();
    let next = tokio::time::timeout(Duration::from_secs(2), sub.changed()).await.unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn stream_yields_current_snapshot_first() {
    let store = store();
    store.insert("beats", Fields::new()).await.unwrap();
    let sub = LiveQuery::new("beats", Query::new()).start(store.clone()).await.unwrap();
    let mut stream = sub.into_stream();
    let first = stream.next().await.unwrap();
    assert_eq!(first.documents.len(), 1);

    store.insert("beats", Fields::new()).await.unwrap();
    let second = tokio::time::timeout(Duration::from_secs(2), stream.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.documents.len(), 2);
}
