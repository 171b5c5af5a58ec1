//! Race sinks that feed the browser.
//!
//! Every update lands in the shared [`TrackView`](crate::state::TrackView) and
//! goes out to SSE clients as a [`RaceEvent`].

use race::core::sink::{AnnouncementSink, PositionSink, TextSink};
use race::run::LaneSinks;

use crate::state::{AppState, RaceEvent};

/// Position and step-text sink for one lane of one race.
#[derive(Clone)]
pub struct BrowserLane {
    state: AppState,
    race_id: u64,
    lane: usize,
}

impl BrowserLane {
    pub fn new(state: AppState, race_id: u64, lane: usize) -> Self {
        Self {
            state,
            race_id,
            lane,
        }
    }
}

impl PositionSink for BrowserLane {
    fn place_marker(&mut self, identity: &str) {
        self.state.update_lane(self.race_id, self.lane, |view| {
            view.identity = identity.to_string();
            view.offset = 0;
        });
        self.state.publish(RaceEvent::Marker {
            race_id: self.race_id,
            lane: self.lane,
            identity: identity.to_string(),
        });
    }

    fn set_offset(&mut self, offset_px: u32) {
        self.state
            .update_lane(self.race_id, self.lane, |view| view.offset = offset_px);
        self.state.publish(RaceEvent::Position {
            race_id: self.race_id,
            lane: self.lane,
            offset: offset_px,
        });
    }
}

impl TextSink for BrowserLane {
    fn set_text(&mut self, text: &str) {
        self.state
            .update_lane(self.race_id, self.lane, |view| view.text = text.to_string());
        self.state.publish(RaceEvent::Steps {
            race_id: self.race_id,
            lane: self.lane,
            text: text.to_string(),
        });
    }
}

/// Appends results to the shared announcement area.
pub struct BrowserBoard {
    state: AppState,
    race_id: u64,
}

impl BrowserBoard {
    pub fn new(state: AppState, race_id: u64) -> Self {
        Self { state, race_id }
    }
}

impl AnnouncementSink for BrowserBoard {
    fn append(&mut self, message: &str) {
        self.state.push_announcement(message);
        self.state.publish(RaceEvent::Announcement {
            race_id: self.race_id,
            text: message.to_string(),
        });
    }
}

/// Both lanes of a race.
pub fn lanes(state: &AppState, race_id: u64) -> [LaneSinks; 2] {
    [0, 1].map(|lane| {
        let sink = BrowserLane::new(state.clone(), race_id, lane);
        LaneSinks::new(sink.clone(), sink)
    })
}
