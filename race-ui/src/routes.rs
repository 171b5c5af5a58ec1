//! HTTP route handlers for the race API.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use race::run::{build_race, start};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::sinks::{BrowserBoard, lanes};
use crate::state::{AppState, RaceEvent, TrackView};

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/races", post(start_race))
        .route("/resize", post(resize))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    track_width: u32,
    finish_line: u32,
    #[serde(flatten)]
    view: TrackView,
}

/// GET /api/state - track, lanes and announcements for a fresh page.
async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(StateResponse {
        track_width: state.track_width(),
        finish_line: state.finish_line.distance(),
        view: state.snapshot(),
    })
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RaceStarted {
    race_id: u64,
}

/// POST /api/races - the start button: build two contestants and run a race.
pub async fn start_race(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RaceStarted>), StatusCode> {
    let race_id = state.begin_race();
    state.publish(RaceEvent::RaceStarted {
        race_id,
        contestants: state.config.contestants.clone(),
        finish_line: state.finish_line.distance(),
    });

    let race = build_race(
        &state.config,
        state.finish_line.clone(),
        lanes(&state, race_id),
        Box::new(BrowserBoard::new(state.clone(), race_id)),
    )
    .map_err(|err| {
        warn!(race_id, error = %err, "failed to build race");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let handle = start(race, state.config.tick_interval()).map_err(|err| {
        warn!(race_id, error = %err, "failed to start race");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tokio::spawn(async move {
        match handle.finished().await {
            Ok(race) => {
                if let Some(result) = race.result() {
                    info!(race_id, winner = %result.winner, steps = result.steps, "race complete");
                }
            }
            Err(err) => warn!(race_id, error = %err, "race stopped without a winner"),
        }
    });

    Ok((StatusCode::ACCEPTED, Json(RaceStarted { race_id })))
}

#[derive(Debug, Deserialize)]
pub struct ResizeRequest {
    width: u32,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResizeResponse {
    track_width: u32,
    finish_line: u32,
}

/// POST /api/resize - viewport width changed; move the finish line.
pub async fn resize(
    State(state): State<AppState>,
    Json(request): Json<ResizeRequest>,
) -> Json<ResizeResponse> {
    let finish_line = state.resize(request.width);
    info!(width = request.width, finish_line, "track resized");
    Json(ResizeResponse {
        track_width: request.width,
        finish_line,
    })
}
