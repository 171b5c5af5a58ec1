//! Winner detection and per-tick race logic.

use std::fmt;

use crate::core::contestant::Contestant;
use crate::core::finish_line::FinishLine;
use crate::core::sink::AnnouncementSink;
use crate::core::types::{RaceResult, Tick};

/// Result line appended to the announcement sink.
pub fn announcement_text(identity: &str, distance_traveled: u32) -> String {
    format!("{identity} has won the race in {distance_traveled} steps!")
}

/// Two contestants racing toward a shared finish line.
///
/// A race is either running or ended. Once a winner is declared it never
/// changes and no contestant advances again.
pub struct Race {
    contestants: [Contestant; 2],
    winner: Option<usize>,
    finish_line: FinishLine,
    announcements: Box<dyn AnnouncementSink>,
    ticks: u32,
}

impl Race {
    pub fn new(
        first: Contestant,
        second: Contestant,
        finish_line: FinishLine,
        announcements: Box<dyn AnnouncementSink>,
    ) -> Self {
        Self {
            contestants: [first, second],
            winner: None,
            finish_line,
            announcements,
            ticks: 0,
        }
    }

    /// Run one tick: declare a winner if someone reached the finish line,
    /// otherwise advance both contestants in construction order.
    pub fn racing(&mut self) -> Tick {
        if self.winner.is_some() {
            return Tick::Ended;
        }
        self.ticks += 1;

        if let Some(index) = self.winner_index() {
            self.winner = Some(index);
            self.announce_winner(index);
            return Tick::Finished { winner: index };
        }

        for contestant in &mut self.contestants {
            contestant.advance();
        }
        Tick::Advanced
    }

    /// First contestant, in construction order, at or past the finish line.
    pub fn check_for_winner(&self) -> Option<&Contestant> {
        self.winner_index().map(|index| &self.contestants[index])
    }

    fn winner_index(&self) -> Option<usize> {
        let finish = self.finish_line.distance();
        self.contestants
            .iter()
            .position(|contestant| contestant.distance_traveled() >= finish)
    }

    fn announce_winner(&mut self, index: usize) {
        let winner = &self.contestants[index];
        let message = announcement_text(winner.identity(), winner.distance_traveled());
        self.announcements.append(&message);
    }

    pub fn winner(&self) -> Option<&Contestant> {
        self.winner.map(|index| &self.contestants[index])
    }

    pub fn contestants(&self) -> &[Contestant; 2] {
        &self.contestants
    }

    pub fn finish_line(&self) -> &FinishLine {
        &self.finish_line
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Summary of a finished race, or `None` while it is still running.
    pub fn result(&self) -> Option<RaceResult> {
        self.winner().map(|winner| RaceResult {
            winner: winner.identity().to_string(),
            steps: winner.distance_traveled(),
            ticks: self.ticks,
        })
    }
}

impl fmt::Debug for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Race")
            .field("contestants", &self.contestants)
            .field("winner", &self.winner)
            .field("finish_line", &self.finish_line.distance())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}
