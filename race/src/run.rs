//! Timer-driven race orchestration.
//!
//! [`start`] owns the repeating timer: one tokio task ticks the race at a fixed
//! interval and leaves the loop on the tick that declares a winner, so no tick
//! ever runs after the announcement. [`run_races`] drives several races in a
//! row against one shared finish line, applying scheduled resize notifications.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::core::contestant::Contestant;
use crate::core::finish_line::FinishLine;
use crate::core::race::Race;
use crate::core::sink::{AnnouncementSink, PositionSink, TextSink};
use crate::core::steps::{RandomSteps, StepRange, StepSource};
use crate::core::types::{RaceResult, Tick};
use crate::io::config::RaceConfig;

/// Display sinks for one contestant.
pub struct LaneSinks {
    pub position: Box<dyn PositionSink>,
    pub steps: Box<dyn TextSink>,
}

impl LaneSinks {
    pub fn new(position: impl PositionSink + 'static, steps: impl TextSink + 'static) -> Self {
        Self {
            position: Box::new(position),
            steps: Box::new(steps),
        }
    }
}

/// A race whose timer is running.
#[derive(Debug)]
pub struct RaceHandle {
    task: JoinHandle<Race>,
}

impl RaceHandle {
    /// Wait for the winner and get the finished race back.
    pub async fn finished(self) -> Result<Race> {
        self.task.await.context("race timer task stopped")
    }
}

/// Start ticking `race` every `period`. The first tick fires one period from now.
///
/// Consumes the race, so a race can only ever be started once.
pub fn start(mut race: Race, period: Duration) -> Result<RaceHandle> {
    if period.is_zero() {
        bail!("tick interval must be > 0");
    }
    info!(
        finish_line = race.finish_line().distance(),
        interval = ?period,
        "race started"
    );
    let task = tokio::spawn(async move {
        let mut timer = time::interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            timer.tick().await;
            match race.racing() {
                Tick::Advanced => {
                    let [first, second] = race.contestants();
                    debug!(
                        tick = race.ticks(),
                        first = first.distance_traveled(),
                        second = second.distance_traveled(),
                        finish_line = race.finish_line().distance(),
                        "contestants advanced"
                    );
                }
                Tick::Finished { .. } | Tick::Ended => break,
            }
        }
        if let Some(result) = race.result() {
            info!(
                winner = %result.winner,
                steps = result.steps,
                ticks = result.ticks,
                "race finished"
            );
        }
        race
    });
    Ok(RaceHandle { task })
}

/// Construct both contestants and their race from `config`: the start-button
/// handler.
///
/// Contestants are created in `config.contestants` order, which is also the
/// tie-break order.
pub fn build_race(
    config: &RaceConfig,
    finish_line: FinishLine,
    lanes: [LaneSinks; 2],
    announcements: Box<dyn AnnouncementSink>,
) -> Result<Race> {
    config.validate()?;
    let range = config.step_range()?;
    let [first_lane, second_lane] = lanes;
    let [first_id, second_id] = &config.contestants;
    let first = Contestant::new(
        first_id.clone(),
        first_lane.position,
        first_lane.steps,
        step_source(range, config.seed, 0),
    );
    let second = Contestant::new(
        second_id.clone(),
        second_lane.position,
        second_lane.steps,
        step_source(range, config.seed, 1),
    );
    Ok(Race::new(first, second, finish_line, announcements))
}

fn step_source(range: StepRange, seed: Option<u64>, index: u64) -> Box<dyn StepSource> {
    match seed {
        Some(seed) => Box::new(RandomSteps::seeded(range, seed.wrapping_add(index))),
        None => Box::new(RandomSteps::new(range)),
    }
}

/// A resize notification delivered `after` the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledResize {
    pub after: Duration,
    pub width: u32,
}

impl FromStr for ScheduledResize {
    type Err = anyhow::Error;

    /// Parse `MS=WIDTH`, e.g. `1500=640`.
    fn from_str(raw: &str) -> Result<Self> {
        let (after, width) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("expected MS=WIDTH, got '{raw}'"))?;
        let after: u64 = after
            .trim()
            .parse()
            .with_context(|| format!("invalid resize delay '{after}'"))?;
        let width: u32 = width
            .trim()
            .parse()
            .with_context(|| format!("invalid resize width '{width}'"))?;
        Ok(Self {
            after: Duration::from_millis(after),
            width,
        })
    }
}

/// How many races to run and which resizes to deliver meanwhile.
#[derive(Debug, Clone, Default)]
pub struct RacePlan {
    pub races: u32,
    pub resizes: Vec<ScheduledResize>,
}

/// Pending resize notifications. Dropping it cancels the ones not yet delivered.
#[derive(Debug)]
pub struct ResizeSchedule {
    task: JoinHandle<()>,
}

impl Drop for ResizeSchedule {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Deliver `resizes` to `finish_line` on schedule, relative to now.
pub fn schedule_resizes(
    finish_line: FinishLine,
    mut resizes: Vec<ScheduledResize>,
) -> ResizeSchedule {
    resizes.sort_by_key(|resize| resize.after);
    let origin = Instant::now();
    let task = tokio::spawn(async move {
        for resize in resizes {
            time::sleep_until(origin + resize.after).await;
            let distance = finish_line.resize(resize.width);
            info!(width = resize.width, finish_line = distance, "track resized");
        }
    });
    ResizeSchedule { task }
}

/// Run `plan.races` races back to back.
///
/// Every race shares `finish_line` and appends to the same announcement sink,
/// so results accumulate. `lanes` is called once per race for fresh display
/// sinks. With a seed, race `n` draws from `seed + 2n` and `seed + 2n + 1`.
pub async fn run_races<L, A>(
    config: &RaceConfig,
    finish_line: &FinishLine,
    plan: &RacePlan,
    mut lanes: L,
    announcements: A,
) -> Result<Vec<RaceResult>>
where
    L: FnMut() -> [LaneSinks; 2],
    A: AnnouncementSink + Clone + 'static,
{
    config.validate()?;
    let _resizes = schedule_resizes(finish_line.clone(), plan.resizes.clone());
    let mut results = Vec::with_capacity(plan.races as usize);
    for race_no in 0..u64::from(plan.races) {
        let race_config = RaceConfig {
            seed: config
                .seed
                .map(|seed| seed.wrapping_add(race_no.wrapping_mul(2))),
            ..config.clone()
        };
        let race = build_race(
            &race_config,
            finish_line.clone(),
            lanes(),
            Box::new(announcements.clone()),
        )?;
        let race = start(race, config.tick_interval())?.finished().await?;
        let result = race
            .result()
            .ok_or_else(|| anyhow!("race {} ended without a winner", race_no + 1))?;
        results.push(result);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedSteps, Recorder, contestant};

    fn recorded_lanes() -> [LaneSinks; 2] {
        let first = Recorder::default();
        let second = Recorder::default();
        [
            LaneSinks::new(first.clone(), first),
            LaneSinks::new(second.clone(), second),
        ]
    }

    fn fixed_config(steps: u32, track_width: u32) -> RaceConfig {
        RaceConfig {
            min_steps: steps,
            max_steps: steps,
            track_width,
            ..RaceConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timer_ticks_until_winner_then_stops() {
        let (a, _) = contestant("🎃", FixedSteps(10));
        let (b, _) = contestant("🐧", FixedSteps(10));
        let board = Recorder::default();
        let race = Race::new(a, b, FinishLine::new(100, 200), Box::new(board.clone()));

        let started = Instant::now();
        let race = start(race, Duration::from_millis(100))
            .expect("start")
            .finished()
            .await
            .expect("finished");

        assert_eq!(started.elapsed(), Duration::from_millis(1100));
        assert_eq!(race.ticks(), 11);
        assert_eq!(
            board.announcements(),
            vec!["🎃 has won the race in 100 steps!"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_interval() {
        let (a, _) = contestant("🎃", FixedSteps(10));
        let (b, _) = contestant("🐧", FixedSteps(10));
        let race = Race::new(a, b, FinishLine::new(0, 200), Box::new(Recorder::default()));

        let started = Instant::now();
        let race = start(race, Duration::from_millis(100))
            .expect("start")
            .finished()
            .await
            .expect("finished");

        assert_eq!(started.elapsed(), Duration::from_millis(100));
        assert_eq!(race.result().expect("result").steps, 0);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let (a, _) = contestant("🎃", FixedSteps(10));
        let (b, _) = contestant("🐧", FixedSteps(10));
        let race = Race::new(a, b, FinishLine::new(0, 200), Box::new(Recorder::default()));
        assert!(start(race, Duration::ZERO).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn mid_race_resize_ends_race_on_next_tick() {
        let config = fixed_config(10, 1000);
        let finish_line = config.finish_line();
        let board = Recorder::default();
        let plan = RacePlan {
            races: 1,
            resizes: vec![ScheduledResize {
                after: Duration::from_millis(250),
                width: 220,
            }],
        };

        let results = run_races(&config, &finish_line, &plan, recorded_lanes, board.clone())
            .await
            .expect("run");

        assert_eq!(
            results,
            vec![RaceResult {
                winner: "🎃".to_string(),
                steps: 20,
                ticks: 3,
            }]
        );
        assert_eq!(finish_line.distance(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn announcements_accumulate_across_races() {
        let config = fixed_config(10, 300);
        let finish_line = config.finish_line();
        let board = Recorder::default();
        let plan = RacePlan {
            races: 2,
            resizes: Vec::new(),
        };

        let results = run_races(&config, &finish_line, &plan, recorded_lanes, board.clone())
            .await
            .expect("run");

        assert_eq!(results.len(), 2);
        assert_eq!(
            board.announcements(),
            vec![
                "🎃 has won the race in 100 steps!",
                "🎃 has won the race in 100 steps!",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_sessions_are_reproducible() {
        let config = RaceConfig {
            seed: Some(2024),
            ..RaceConfig::default()
        };
        let plan = RacePlan {
            races: 3,
            resizes: Vec::new(),
        };

        let first = run_races(
            &config,
            &config.finish_line(),
            &plan,
            recorded_lanes,
            Recorder::default(),
        )
        .await
        .expect("run");
        let second = run_races(
            &config,
            &config.finish_line(),
            &plan,
            recorded_lanes,
            Recorder::default(),
        )
        .await
        .expect("run");

        assert_eq!(first, second);
        assert!(first.iter().all(|result| result.steps >= 800));
    }

    #[test]
    fn build_race_uses_configured_identities_in_order() {
        let config = RaceConfig {
            contestants: ["🐢".to_string(), "🐇".to_string()],
            ..RaceConfig::default()
        };
        let race = build_race(
            &config,
            config.finish_line(),
            recorded_lanes(),
            Box::new(Recorder::default()),
        )
        .expect("build");
        let ids: Vec<&str> = race.contestants().iter().map(|c| c.identity()).collect();
        assert_eq!(ids, vec!["🐢", "🐇"]);
    }

    #[test]
    fn build_race_rejects_invalid_config() {
        let config = RaceConfig {
            min_steps: 21,
            ..RaceConfig::default()
        };
        let err = build_race(
            &config,
            config.finish_line(),
            recorded_lanes(),
            Box::new(Recorder::default()),
        )
        .expect_err("invalid");
        assert!(err.to_string().contains("min_steps"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_schedule_delivers_nothing() {
        let finish_line = FinishLine::new(800, 200);
        let schedule = schedule_resizes(
            finish_line.clone(),
            vec![ScheduledResize {
                after: Duration::from_millis(100),
                width: 300,
            }],
        );
        drop(schedule);

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(finish_line.distance(), 800);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_session_stops_pending_resizes() {
        let config = fixed_config(10, 1000);
        let finish_line = config.finish_line();
        let plan = RacePlan {
            races: 1,
            resizes: vec![ScheduledResize {
                after: Duration::from_millis(5_000),
                width: 300,
            }],
        };

        let session = run_races(&config, &finish_line, &plan, recorded_lanes, Recorder::default());
        let timed_out = time::timeout(Duration::from_millis(150), session).await;
        assert!(timed_out.is_err(), "session should still be racing");

        time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(finish_line.distance(), 800);
    }

    #[test]
    fn parses_scheduled_resize() {
        let resize: ScheduledResize = "1500=640".parse().expect("parse");
        assert_eq!(
            resize,
            ScheduledResize {
                after: Duration::from_millis(1500),
                width: 640,
            }
        );
        assert!("640".parse::<ScheduledResize>().is_err());
        assert!("x=640".parse::<ScheduledResize>().is_err());
    }
}
