use crate::dto::VerdictResponse;
use crate::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, instrument};
use warden_dns_domain::Verdict;

/// Long-lived push channel: verdicts stream out as they commit, in commit
/// order, newest last. A lagging client loses its oldest queued verdicts
/// (counted) instead of blocking the pipeline.
#[instrument(skip(state), name = "api_stream_verdicts")]
pub async fn stream_verdicts(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.buffer.subscribe();
    let buffer = Arc::clone(&state.buffer);
    debug!("Verdict stream subscriber attached");

    let stream = futures::stream::unfold((receiver, buffer), |(mut receiver, buffer)| async {
        loop {
            match receiver.recv().await {
                Ok(verdict) => {
                    let Some(event) = to_event(&verdict) else {
                        continue;
                    };
                    return Some((Ok::<_, Infallible>(event), (receiver, buffer)));
                }
                Err(broadcast::error::RecvError::Lagged(lost)) => {
                    buffer.note_subscriber_drop(lost);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_event(verdict: &Verdict) -> Option<Event> {
    Event::default()
        .event("verdict")
        .json_data(VerdictResponse::from(verdict))
        .ok()
}
