//! Shared types produced by the race core.

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No winner yet; both contestants advanced.
    Advanced,
    /// This tick declared the winner (index in construction order).
    Finished { winner: usize },
    /// A winner was declared on an earlier tick; nothing changed.
    Ended,
}

/// Outcome of a finished race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceResult {
    /// Identity of the winning contestant.
    pub winner: String,
    /// Distance the winner had traveled when the win was declared.
    pub steps: u32,
    /// Ticks evaluated, including the one that declared the winner.
    pub ticks: u32,
}
