//! Bounded random step generation.

use anyhow::{Result, anyhow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smallest step a contestant takes per tick.
pub const MIN_STEPS: u32 = 5;
/// Largest step a contestant takes per tick.
pub const MAX_STEPS: u32 = 20;

/// Inclusive `[min, max]` range of steps drawn per advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRange {
    min: u32,
    max: u32,
}

impl StepRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(anyhow!("min_steps ({min}) must be <= max_steps ({max})"));
        }
        if max == 0 {
            return Err(anyhow!("max_steps must be > 0"));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, steps: u32) -> bool {
        (self.min..=self.max).contains(&steps)
    }
}

impl Default for StepRange {
    fn default() -> Self {
        Self {
            min: MIN_STEPS,
            max: MAX_STEPS,
        }
    }
}

/// Source of per-advance step counts.
///
/// Contestants own their source so tests can script exact distances.
pub trait StepSource: Send {
    fn draw(&mut self) -> u32;
}

/// Uniform random steps over a [`StepRange`].
pub struct RandomSteps {
    range: StepRange,
    rng: StdRng,
}

impl RandomSteps {
    /// Seed from OS entropy.
    pub fn new(range: StepRange) -> Self {
        Self {
            range,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible draws for a fixed seed.
    pub fn seeded(range: StepRange, seed: u64) -> Self {
        Self {
            range,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl StepSource for RandomSteps {
    fn draw(&mut self) -> u32 {
        self.rng.gen_range(self.range.min..=self.range.max)
    }
}
