//! A single racer and its random-walk movement.

use std::fmt;

use crate::core::sink::{PositionSink, TextSink};
use crate::core::steps::StepSource;

/// Step-count text shown next to a contestant.
pub fn steps_text(identity: &str, distance_traveled: u32) -> String {
    format!("{identity} steps: {distance_traveled}")
}

pub struct Contestant {
    identity: String,
    distance_traveled: u32,
    position: Box<dyn PositionSink>,
    step_text: Box<dyn TextSink>,
    steps: Box<dyn StepSource>,
}

impl Contestant {
    /// Create a contestant at the start line and render its initial state.
    pub fn new(
        identity: impl Into<String>,
        mut position: Box<dyn PositionSink>,
        step_text: Box<dyn TextSink>,
        steps: Box<dyn StepSource>,
    ) -> Self {
        let identity = identity.into();
        position.place_marker(&identity);
        let mut contestant = Self {
            identity,
            distance_traveled: 0,
            position,
            step_text,
            steps,
        };
        contestant.render_steps();
        contestant
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn distance_traveled(&self) -> u32 {
        self.distance_traveled
    }

    /// Take one random step forward and push the new position to the sinks.
    ///
    /// Returns the number of steps drawn.
    pub fn advance(&mut self) -> u32 {
        let steps = self.steps.draw();
        self.distance_traveled = self.distance_traveled.saturating_add(steps);
        self.position.set_offset(self.distance_traveled);
        self.render_steps();
        steps
    }

    fn render_steps(&mut self) {
        let text = steps_text(&self.identity, self.distance_traveled);
        self.step_text.set_text(&text);
    }
}

impl fmt::Debug for Contestant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contestant")
            .field("identity", &self.identity)
            .field("distance_traveled", &self.distance_traveled)
            .finish_non_exhaustive()
    }
}
