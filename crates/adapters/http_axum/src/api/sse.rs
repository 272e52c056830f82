//! Server-Sent Events (SSE) stream of form events.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use pumpsim_app::ports::{ConfigApplier, NameProvider};

use crate::state::AppState;

/// `GET /api/basic/stream`: SSE stream of form events.
///
/// Each event is sent as a JSON `data:` frame whose SSE event name is the
/// change type (`field_changed`, `submitted`, …). The stream continues until
/// the client disconnects.
pub async fn stream<N, A>(
    State(state): State<AppState<N, A>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    let event_rx = state.controller.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_value(&event) {
            Ok(json) => {
                let name = json
                    .get("type")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("message")
                    .to_string();
                Some(Ok(Event::default().event(name).data(json.to_string())))
            }
            Err(err) => {
                tracing::warn!(%err, "failed to serialize form event for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some events were dropped");
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
