//! Output sinks the core writes display state to.
//!
//! Sinks are fire-and-forget: rendering is best effort and never fails a tick.

/// Receives a contestant's position on the track.
pub trait PositionSink: Send {
    /// Place the contestant's marker (its identity) on the track.
    fn place_marker(&mut self, identity: &str);
    /// Move the marker to `offset_px` from the start line.
    fn set_offset(&mut self, offset_px: u32);
}

/// Receives a contestant's step-count text.
pub trait TextSink: Send {
    fn set_text(&mut self, text: &str);
}

/// Receives race results. Messages are appended, never replaced.
pub trait AnnouncementSink: Send {
    fn append(&mut self, message: &str);
}
