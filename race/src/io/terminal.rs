//! Terminal rendering of a race.
//!
//! Each contestant update prints one line: the marker placed proportionally
//! between the start and the finish line, followed by its step text.
//! Announcements print as they arrive, below the results of earlier races.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::core::finish_line::FinishLine;
use crate::core::sink::{AnnouncementSink, PositionSink, TextSink};

/// Default number of columns between the start and the finish line.
pub const DEFAULT_COLUMNS: usize = 60;

type SharedWriter = Box<dyn Write + Send>;

/// Render a lane: `marker` placed at `offset` on a track `columns` wide whose
/// finish line sits at `finish`. Positions past the line are pinned to it.
pub fn track_line(marker: &str, offset: u32, finish: u32, columns: usize) -> String {
    let column = if finish == 0 {
        columns
    } else {
        let scaled = u64::from(offset) * columns as u64 / u64::from(finish);
        usize::try_from(scaled).unwrap_or(columns).min(columns)
    };
    format!(
        "{}{}{}|",
        " ".repeat(column),
        marker,
        " ".repeat(columns - column)
    )
}

struct Lane {
    marker: String,
    offset: u32,
}

struct TrackState {
    out: SharedWriter,
    finish_line: FinishLine,
    columns: usize,
    lanes: Vec<Lane>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn write_line(out: &mut SharedWriter, line: &str) {
    if let Err(err) = writeln!(out, "{line}").and_then(|()| out.flush()) {
        debug!(error = %err, "terminal write failed");
    }
}

/// A track printed to a terminal; hands out one [`TerminalLane`] per contestant.
#[derive(Clone)]
pub struct TerminalTrack {
    state: Arc<Mutex<TrackState>>,
}

impl TerminalTrack {
    pub fn stdout(finish_line: FinishLine, columns: usize) -> Self {
        Self::with_writer(Box::new(io::stdout()), finish_line, columns)
    }

    pub fn with_writer(out: SharedWriter, finish_line: FinishLine, columns: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(TrackState {
                out,
                finish_line,
                columns: columns.max(1),
                lanes: Vec::new(),
            })),
        }
    }

    /// Add a lane for a new contestant.
    pub fn lane(&self) -> TerminalLane {
        let mut state = lock(&self.state);
        state.lanes.push(Lane {
            marker: String::new(),
            offset: 0,
        });
        TerminalLane {
            state: Arc::clone(&self.state),
            index: state.lanes.len() - 1,
        }
    }

    /// Drop all lanes before the next race.
    pub fn reset(&self) {
        lock(&self.state).lanes.clear();
    }

    /// Print the current finish line distance.
    pub fn show_finish_line(&self) {
        let mut state = lock(&self.state);
        let line = format!("finish line: {}", state.finish_line.distance());
        write_line(&mut state.out, &line);
    }
}

/// Position and step-text sink for one contestant on a [`TerminalTrack`].
pub struct TerminalLane {
    state: Arc<Mutex<TrackState>>,
    index: usize,
}

impl TerminalLane {
    /// Clone the handle so the same lane can back both contestant sinks.
    pub fn handle(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            index: self.index,
        }
    }
}

impl PositionSink for TerminalLane {
    fn place_marker(&mut self, identity: &str) {
        let mut state = lock(&self.state);
        if let Some(lane) = state.lanes.get_mut(self.index) {
            lane.marker = identity.to_string();
            lane.offset = 0;
        }
    }

    fn set_offset(&mut self, offset_px: u32) {
        let mut state = lock(&self.state);
        if let Some(lane) = state.lanes.get_mut(self.index) {
            lane.offset = offset_px;
        }
    }
}

impl TextSink for TerminalLane {
    fn set_text(&mut self, text: &str) {
        let mut state = lock(&self.state);
        let finish = state.finish_line.distance();
        let columns = state.columns;
        let Some(lane) = state.lanes.get(self.index) else {
            return;
        };
        let line = format!(
            "{}  {}",
            track_line(&lane.marker, lane.offset, finish, columns),
            text
        );
        write_line(&mut state.out, &line);
    }
}

/// Announcement sink that prints each result below the earlier ones.
#[derive(Clone)]
pub struct AnnouncementBoard {
    out: Arc<Mutex<SharedWriter>>,
}

impl AnnouncementBoard {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(out: SharedWriter) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }
}

impl AnnouncementSink for AnnouncementBoard {
    fn append(&mut self, message: &str) {
        write_line(&mut lock(&self.out), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(lock(&self.0).clone())
                .expect("utf8")
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            lock(&self.0).extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn track_line_scales_offset() {
        assert_eq!(track_line("x", 0, 100, 10), "x          |");
        assert_eq!(track_line("x", 50, 100, 10), "     x     |");
        assert_eq!(track_line("x", 100, 100, 10), "          x|");
    }

    #[test]
    fn track_line_pins_past_the_finish() {
        assert_eq!(track_line("x", 500, 100, 4), "    x|");
        assert_eq!(track_line("x", 0, 0, 4), "    x|");
    }

    #[test]
    fn lane_prints_position_with_text() {
        let buffer = Buffer::default();
        let track = TerminalTrack::with_writer(
            Box::new(buffer.clone()),
            FinishLine::new(100, 200),
            10,
        );
        let mut lane = track.lane();
        lane.place_marker("o");
        lane.set_text("o steps: 0");
        lane.set_offset(30);
        lane.set_text("o steps: 30");

        assert_eq!(
            buffer.lines(),
            vec!["o          |  o steps: 0", "   o       |  o steps: 30"]
        );
    }

    #[test]
    fn reset_detaches_old_lanes() {
        let buffer = Buffer::default();
        let track = TerminalTrack::with_writer(
            Box::new(buffer.clone()),
            FinishLine::new(100, 200),
            10,
        );
        let mut stale = track.lane();
        track.reset();
        stale.set_text("stale");
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn board_appends_through_every_clone() {
        let buffer = Buffer::default();
        let mut board = AnnouncementBoard::with_writer(Box::new(buffer.clone()));
        let mut next_race = board.clone();
        board.append("first");
        next_race.append("second");
        assert_eq!(buffer.lines(), vec!["first", "second"]);
    }
}
