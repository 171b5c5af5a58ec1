//! Server-Sent Events stream of race updates.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use tokio::sync::broadcast;
use tracing::warn;

use crate::state::{AppState, RaceEvent};

/// Encode one update as an SSE `race` event with a JSON body.
fn to_sse(event: &RaceEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Event::default().event("race").data(json)),
        Err(err) => {
            warn!(error = %err, "failed to encode race event");
            None
        }
    }
}

/// SSE endpoint handler.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.event_tx.subscribe();

    let stream = async_stream::stream! {
        // Send initial connected event
        yield Ok(Event::default().event("connected").data("{}"));

        loop {
            match rx.recv().await {
                Ok(race_event) => {
                    if let Some(event) = to_sse(&race_event) {
                        yield Ok(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "SSE client lagged, some race updates dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_race_event_encodes() {
        let events = [
            RaceEvent::RaceStarted {
                race_id: 4,
                contestants: ["🎃".to_string(), "🐧".to_string()],
                finish_line: 800,
            },
            RaceEvent::Steps {
                race_id: 4,
                lane: 0,
                text: "🎃 steps: 12".to_string(),
            },
            RaceEvent::Announcement {
                race_id: 4,
                text: "🐧 has won the race in 812 steps!".to_string(),
            },
            RaceEvent::FinishLine {
                track_width: 600,
                distance: 400,
            },
        ];
        assert!(events.iter().all(|event| to_sse(event).is_some()));
    }
}
