use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use gasguard_core::reading::Reading;

use crate::state::AppState;

fn reading_event(reading: &Reading) -> Event {
    Event::default()
        .event("reading")
        .data(serde_json::to_string(reading).unwrap_or_default())
}

/// GET /api/stream — SSE stream of readings.
///
/// A new subscriber first receives a snapshot of the latest reading (when
/// one exists), then every reading published after subscribing, in publish
/// order. Keepalive comments detect dead connections; a dropped connection
/// only drops its own receiver.
pub async fn sse_stream(State(app): State<AppState>) -> impl axum::response::IntoResponse {
    let rx = app.readings_tx.subscribe();
    let snapshot = app.history.lock().unwrap().latest().cloned();

    let initial =
        tokio_stream::iter(snapshot.map(|r| Ok::<Event, Infallible>(reading_event(&r))));
    let live = BroadcastStream::new(rx)
        .filter_map(|msg| msg.ok().map(|reading| Ok(reading_event(&reading))));

    Sse::new(initial.chain(live)).keep_alive(KeepAlive::default())
}
