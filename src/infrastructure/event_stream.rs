// Server-sent event stream of console snapshots
use crate::domain::console::ConsoleSnapshot;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::sync::Arc;
use tokio::sync::watch;

const SNAPSHOT_EVENT: &str = "snapshot";

/// Yields the current snapshot, then one event per published frame. Ends when
/// the console actor goes away.
pub fn snapshot_events(
    mut rx: watch::Receiver<Arc<ConsoleSnapshot>>,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    async_stream::stream! {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            yield Event::default()
                .event(SNAPSHOT_EVENT)
                .json_data(snapshot.as_ref());

            if rx.changed().await.is_err() {
                tracing::debug!("Snapshot publisher closed, ending event stream");
                break;
            }
        }
    }
}

pub fn snapshot_stream_response(
    rx: watch::Receiver<Arc<ConsoleSnapshot>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    Sse::new(snapshot_events(rx)).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::console::ConsoleCore;
    use crate::domain::channel::weather_station_catalog;
    use crate::infrastructure::config::ConsoleSettings;
    use chrono::Utc;
    use futures::StreamExt;
    use std::collections::HashMap;

    fn snapshot() -> Arc<ConsoleSnapshot> {
        let core = ConsoleCore::new(
            weather_station_catalog(),
            &HashMap::new(),
            &ConsoleSettings::default(),
        );
        Arc::new(core.snapshot(Utc::now()))
    }

    #[tokio::test]
    async fn test_stream_follows_publisher() {
        let (tx, rx) = watch::channel(snapshot());
        let mut events = Box::pin(snapshot_events(rx));

        assert!(events.next().await.unwrap().is_ok());

        tx.send_replace(snapshot());
        assert!(events.next().await.unwrap().is_ok());

        drop(tx);
        assert!(events.next().await.is_none());
    }
}
