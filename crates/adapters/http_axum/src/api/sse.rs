//! Server-Sent Events (SSE) stream for real-time intents.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use pixelhub_app::ports::IntentSink;

use crate::state::AppState;

/// `GET /api/intents/stream` — SSE stream of dispatched intents.
///
/// Subscribes to the intent bus broadcast channel and sends
/// JSON-encoded intents as SSE `data:` frames. The stream continues
/// until the client disconnects or the bus is closed. Accessory-update
/// intents are only observable here; they never reach MQTT.
pub async fn stream<S>(
    State(state): State<AppState<S>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    S: IntentSink + Send + Sync + 'static,
{
    let intent_rx = state.intent_bus.subscribe();
    let intent_stream = BroadcastStream::new(intent_rx).filter_map(|result| match result {
        Ok(intent) => match serde_json::to_string(&intent) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize intent to JSON for SSE stream");
                None
            }
        },
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(
                skipped = n,
                "SSE subscriber lagged, some intents were dropped"
            );
            None
        }
    });

    Sse::new(intent_stream).keep_alive(KeepAlive::default())
}
