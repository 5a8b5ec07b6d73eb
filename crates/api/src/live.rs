//! Server-Sent Events for live query subscriptions.
//!
//! Every snapshot of a [`Subscription`] becomes one `snapshot` event whose
//! data is `{ "sequence": n, "data": [documents] }`. The stream ends, and the
//! live query stops, when the client disconnects.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use serde_json::{json, Value};

use beatstore_db::{Snapshot, Subscription};

/// SSE event name for snapshots.
pub const SNAPSHOT_EVENT: &str = "snapshot";

const KEEP_ALIVE_SECS: u64 = 15;

/// Stream a subscription to the client.
pub fn snapshot_stream(
    subscription: Subscription,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = subscription
        .into_stream()
        .map(|snapshot| Ok(snapshot_event(&snapshot)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(KEEP_ALIVE_SECS))
            .text("keep-alive"),
    )
}

/// JSON body of one snapshot event.
pub fn snapshot_payload(snapshot: &Snapshot) -> Value {
    let documents: Vec<Value> = snapshot.documents.iter().map(|d| d.to_json()).collect();
    json!({
        "sequence": snapshot.sequence,
        "data": documents,
    })
}

fn snapshot_event(snapshot: &Snapshot) -> Event {
    Event::default()
        .event(SNAPSHOT_EVENT)
        .data(snapshot_payload(snapshot).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use beatstore_db::Document;

    #[test]
    fn payload_lists_documents_with_ids() {
        let mut fields = beatstore_db::Fields::new();
        fields.insert("title".into(), json!("Night Drive"));
        let snapshot = Snapshot {
            sequence: 3,
            documents: Arc::new(vec![Document::new("b1", fields)]),
        };
        let payload = snapshot_payload(&snapshot);
        assert_eq!(payload["sequence"], 3);
        assert_eq!(payload["data"][0]["id"], "b1");
        assert_eq!(payload["data"][0]["title"], "Night Drive");
    }
}
