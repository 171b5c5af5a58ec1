//! Race configuration stored in `race.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::finish_line::{FINISH_LINE_OFFSET, FinishLine};
use crate::core::steps::{MAX_STEPS, MIN_STEPS, StepRange};

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "race.toml";

/// Race configuration (TOML).
///
/// Missing fields default to the classic emoji race: 🎃 against 🐧, 5 to 20
/// steps every 100ms, finish line 200px before the end of the track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RaceConfig {
    /// Distance between the finish line and the end of the track.
    pub finish_line_offset: u32,

    /// Time between two ticks, in milliseconds.
    pub tick_interval_ms: u64,

    /// Inclusive bounds of the steps taken per tick.
    pub min_steps: u32,
    pub max_steps: u32,

    /// Track width used until the first resize notification.
    pub track_width: u32,

    /// Contestant identities, in tie-break order.
    pub contestants: [String; 2],

    /// Seed for reproducible step draws. Unset draws from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            finish_line_offset: FINISH_LINE_OFFSET,
            tick_interval_ms: 100,
            min_steps: MIN_STEPS,
            max_steps: MAX_STEPS,
            track_width: 1000,
            contestants: ["🎃".to_string(), "🐧".to_string()],
            seed: None,
        }
    }
}

impl RaceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(anyhow!("tick_interval_ms must be > 0"));
        }
        self.step_range()?;
        for (index, identity) in self.contestants.iter().enumerate() {
            if identity.trim().is_empty() {
                return Err(anyhow!("contestants[{index}] must be a non-empty label"));
            }
        }
        Ok(())
    }

    pub fn step_range(&self) -> Result<StepRange> {
        StepRange::new(self.min_steps, self.max_steps)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Finish line for the configured initial track width.
    pub fn finish_line(&self) -> FinishLine {
        FinishLine::for_track(self.track_width, self.finish_line_offset)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RaceConfig::default()`.
pub fn load_config(path: &Path) -> Result<RaceConfig> {
    if !path.exists() {
        let cfg = RaceConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RaceConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &RaceConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
