//! Test-only sinks and step sources for driving races deterministically.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::contestant::Contestant;
use crate::core::sink::{AnnouncementSink, PositionSink, TextSink};
use crate::core::steps::StepSource;

/// Everything a sink was asked to render, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Marker(String),
    Offset(u32),
    Text(String),
    Announcement(String),
}

/// Sink that records every update. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<DisplayEvent>>>,
}

impl Recorder {
    fn log(&self) -> MutexGuard<'_, Vec<DisplayEvent>> {
        self.events.lock().expect("recorder lock")
    }

    pub fn events(&self) -> Vec<DisplayEvent> {
        self.log().clone()
    }

    pub fn offsets(&self) -> Vec<u32> {
        self.log()
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Offset(px) => Some(*px),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn announcements(&self) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Announcement(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl PositionSink for Recorder {
    fn place_marker(&mut self, identity: &str) {
        self.log().push(DisplayEvent::Marker(identity.to_string()));
    }

    fn set_offset(&mut self, offset_px: u32) {
        self.log().push(DisplayEvent::Offset(offset_px));
    }
}

impl TextSink for Recorder {
    fn set_text(&mut self, text: &str) {
        self.log().push(DisplayEvent::Text(text.to_string()));
    }
}

impl AnnouncementSink for Recorder {
    fn append(&mut self, message: &str) {
        self.log()
            .push(DisplayEvent::Announcement(message.to_string()));
    }
}

/// Always takes the same number of steps.
#[derive(Debug, Clone, Copy)]
pub struct FixedSteps(pub u32);

impl StepSource for FixedSteps {
    fn draw(&mut self) -> u32 {
        self.0
    }
}

/// Replays a fixed sequence of steps, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedSteps {
    steps: Vec<u32>,
    next: usize,
}

impl ScriptedSteps {
    pub fn new(steps: impl IntoIterator<Item = u32>) -> Self {
        let steps: Vec<u32> = steps.into_iter().collect();
        assert!(!steps.is_empty(), "scripted steps must not be empty");
        Self { steps, next: 0 }
    }
}

impl StepSource for ScriptedSteps {
    fn draw(&mut self) -> u32 {
        let steps = self.steps[self.next % self.steps.len()];
        self.next += 1;
        steps
    }
}

/// Build a contestant whose position and step text both go to one recorder.
pub fn contestant(identity: &str, steps: impl StepSource + 'static) -> (Contestant, Recorder) {
    let recorder = Recorder::default();
    let contestant = Contestant::new(
        identity,
        Box::new(recorder.clone()),
        Box::new(recorder.clone()),
        Box::new(steps),
    );
    (contestant, recorder)
}
