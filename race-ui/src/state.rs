//! Shared application state for the race server.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use race::core::finish_line::FinishLine;
use race::io::config::RaceConfig;
use serde::Serialize;
use tokio::sync::broadcast;

/// Display updates broadcast to SSE clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RaceEvent {
    RaceStarted {
        race_id: u64,
        contestants: [String; 2],
        finish_line: u32,
    },
    Marker {
        race_id: u64,
        lane: usize,
        identity: String,
    },
    Position {
        race_id: u64,
        lane: usize,
        offset: u32,
    },
    Steps {
        race_id: u64,
        lane: usize,
        text: String,
    },
    Announcement {
        race_id: u64,
        text: String,
    },
    FinishLine {
        track_width: u32,
        distance: u32,
    },
}

/// Last rendered state of one lane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaneView {
    pub identity: String,
    pub offset: u32,
    pub text: String,
}

/// What a freshly loaded page needs to draw the track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackView {
    /// Race whose lanes are shown; the most recently started one.
    pub race_id: Option<u64>,
    pub lanes: [LaneView; 2],
    /// Every result so far, oldest first.
    pub announcements: Vec<String>,
}

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RaceConfig>,
    /// Finish line read by every running race.
    pub finish_line: FinishLine,
    track_width: Arc<AtomicU32>,
    next_race_id: Arc<AtomicU64>,
    view: Arc<Mutex<TrackView>>,
    /// Broadcast sender for display updates.
    pub event_tx: Arc<broadcast::Sender<RaceEvent>>,
}

impl AppState {
    pub fn new(config: RaceConfig) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            finish_line: config.finish_line(),
            track_width: Arc::new(AtomicU32::new(config.track_width)),
            next_race_id: Arc::new(AtomicU64::new(1)),
            view: Arc::new(Mutex::new(TrackView::default())),
            config: Arc::new(config),
            event_tx: Arc::new(event_tx),
        }
    }

    pub fn track_width(&self) -> u32 {
        self.track_width.load(Ordering::SeqCst)
    }

    /// Apply a viewport resize and tell every client where the line moved.
    pub fn resize(&self, track_width: u32) -> u32 {
        self.track_width.store(track_width, Ordering::SeqCst);
        let distance = self.finish_line.resize(track_width);
        self.publish(RaceEvent::FinishLine {
            track_width,
            distance,
        });
        distance
    }

    /// Reserve an id for a new race and make it the one shown in the view.
    pub fn begin_race(&self) -> u64 {
        let race_id = self.next_race_id.fetch_add(1, Ordering::SeqCst);
        let mut view = self.view();
        view.race_id = Some(race_id);
        view.lanes = Default::default();
        race_id
    }

    pub fn snapshot(&self) -> TrackView {
        self.view().clone()
    }

    /// Run `update` against the view, unless `race_id` is no longer shown.
    pub fn update_lane(&self, race_id: u64, lane: usize, update: impl FnOnce(&mut LaneView)) {
        let mut view = self.view();
        if view.race_id != Some(race_id) {
            return;
        }
        if let Some(lane) = view.lanes.get_mut(lane) {
            update(lane);
        }
    }

    pub fn push_announcement(&self, text: &str) {
        self.view().announcements.push(text.to_string());
    }

    /// Send to connected clients; no receivers is not an error.
    pub fn publish(&self, event: RaceEvent) {
        let _ = self.event_tx.send(event);
    }

    fn view(&self) -> MutexGuard<'_, TrackView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
