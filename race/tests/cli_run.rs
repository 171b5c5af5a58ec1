//! CLI tests for the `race` binary.
//!
//! Spawns the binary against temp config files and checks exit codes and the
//! announcement lines on stdout.

use std::fs;
use std::process::Command;

use race::exit_codes;

fn write_fast_config(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("race.toml");
    fs::write(
        &path,
        "tick_interval_ms = 1\ntrack_width = 260\nseed = 7\n",
    )
    .expect("write config");
    path
}

#[test]
fn run_announces_every_race() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = write_fast_config(temp.path());

    let output = Command::new(env!("CARGO_BIN_EXE_race"))
        .arg("run")
        .arg("--config")
        .arg(&config)
        .args(["--races", "2"])
        .output()
        .expect("race run");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.matches("has won the race in").count(), 2);
    assert!(stdout.contains("race: n=2 winner="));
    assert!(stdout.contains("finish line: 60"));
}

#[test]
fn check_rejects_inverted_step_range() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = temp.path().join("race.toml");
    fs::write(&config, "min_steps = 25\nmax_steps = 20\n").expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_race"))
        .arg("check")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("race check");

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("min_steps"));
}

#[test]
fn init_writes_defaults_and_refuses_overwrite() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = temp.path().join("race.toml");

    let status = Command::new(env!("CARGO_BIN_EXE_race"))
        .arg("init")
        .arg("--config")
        .arg(&config)
        .status()
        .expect("race init");
    assert_eq!(status.code(), Some(exit_codes::OK));
    let written = race::io::config::load_config(&config).expect("load");
    assert_eq!(written, race::io::config::RaceConfig::default());

    let status = Command::new(env!("CARGO_BIN_EXE_race"))
        .arg("init")
        .arg("--config")
        .arg(&config)
        .status()
        .expect("race init");
    assert_eq!(status.code(), Some(exit_codes::INVALID));
}
