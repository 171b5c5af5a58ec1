//! Shared finish line threshold.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Distance between the finish line and the right edge of the track.
pub const FINISH_LINE_OFFSET: u32 = 200;

/// Cloneable handle over the current finish line distance.
///
/// Owned by the bootstrap layer; every race reads it on each tick while resize
/// notifications write it. Clones observe the same value.
#[derive(Debug, Clone)]
pub struct FinishLine {
    distance: Arc<AtomicU32>,
    offset: u32,
}

impl FinishLine {
    pub fn new(distance: u32, offset: u32) -> Self {
        Self {
            distance: Arc::new(AtomicU32::new(distance)),
            offset,
        }
    }

    /// Finish line placed `offset` before the end of a track `track_width` wide.
    pub fn for_track(track_width: u32, offset: u32) -> Self {
        Self::new(track_width.saturating_sub(offset), offset)
    }

    pub fn distance(&self) -> u32 {
        self.distance.load(Ordering::SeqCst)
    }

    pub fn set(&self, distance: u32) {
        self.distance.store(distance, Ordering::SeqCst);
    }

    /// Apply a resize notification. Returns the new distance.
    ///
    /// Widths narrower than the offset clamp the finish line to 0.
    pub fn resize(&self, track_width: u32) -> u32 {
        let distance = track_width.saturating_sub(self.offset);
        self.set(distance);
        distance
    }
}
