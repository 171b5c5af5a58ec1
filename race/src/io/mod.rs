//! I/O helpers for race commands.

pub mod config;
pub mod terminal;
