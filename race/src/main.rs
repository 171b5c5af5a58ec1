//! Emoji race in the terminal.
//!
//! Two contestants take 5 to 20 steps every tick until one reaches the finish
//! line, placed `finish_line_offset` before the end of the track. Results of
//! consecutive races accumulate on the announcement board.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use race::exit_codes;
use race::io::config::{DEFAULT_CONFIG_PATH, RaceConfig, load_config, write_config};
use race::io::terminal::{AnnouncementBoard, DEFAULT_COLUMNS, TerminalTrack};
use race::logging;
use race::run::{LaneSinks, RacePlan, ScheduledResize, run_races};

#[derive(Parser)]
#[command(name = "race", version, about = "Two emojis race to the finish line")]
struct Cli {
    /// Log race start, finish and resizes to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one or more races in the terminal.
    Run {
        /// Config file (defaults apply when it does not exist).
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Number of races to run back to back.
        #[arg(short, long, default_value_t = 1)]
        races: u32,
        /// Override the initial track width.
        #[arg(long)]
        track_width: Option<u32>,
        /// Seed step draws for a reproducible session.
        #[arg(long)]
        seed: Option<u64>,
        /// Resize the track during the session: `MS=WIDTH` (repeatable).
        #[arg(long = "resize", value_name = "MS=WIDTH")]
        resizes: Vec<ScheduledResize>,
        /// Terminal columns between the start and the finish line.
        #[arg(long, default_value_t = DEFAULT_COLUMNS)]
        columns: usize,
    },
    /// Write the default config file.
    Init {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate a config file.
    Check {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            config,
            races,
            track_width,
            seed,
            resizes,
            columns,
        } => {
            let mut cfg = load_config(&config)?;
            if let Some(width) = track_width {
                cfg.track_width = width;
            }
            if seed.is_some() {
                cfg.seed = seed;
            }
            cmd_run(&cfg, RacePlan { races, resizes }, columns)
        }
        Command::Init { config, force } => cmd_init(&config, force),
        Command::Check { config } => cmd_check(&config),
    }
}

fn cmd_run(cfg: &RaceConfig, plan: RacePlan, columns: usize) -> Result<()> {
    if plan.races == 0 {
        bail!("--races must be > 0");
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build tokio runtime")?;

    let finish_line = cfg.finish_line();
    let track = TerminalTrack::stdout(finish_line.clone(), columns);
    let board = AnnouncementBoard::stdout();
    track.show_finish_line();

    let results = runtime.block_on(run_races(
        cfg,
        &finish_line,
        &plan,
        || {
            track.reset();
            let first = track.lane();
            let second = track.lane();
            [
                LaneSinks::new(first.handle(), first),
                LaneSinks::new(second.handle(), second),
            ]
        },
        board.clone(),
    ))?;

    for (index, result) in results.iter().enumerate() {
        println!(
            "race: n={} winner={} steps={} ticks={}",
            index + 1,
            result.winner,
            result.steps,
            result.ticks
        );
    }
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    write_config(path, &RaceConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    println!("init: config={}", path.display());
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let cfg = load_config(path)?;
    println!(
        "check: ok contestants={},{} steps={}..={} interval_ms={} finish_line={}",
        cfg.contestants[0],
        cfg.contestants[1],
        cfg.min_steps,
        cfg.max_steps,
        cfg.tick_interval_ms,
        cfg.finish_line().distance()
    );
    Ok(())
}
