//! Two-contestant emoji race.
//!
//! Two contestants advance a random number of steps on every tick of a
//! repeating timer until one reaches the finish line. The architecture keeps a
//! strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (contestants, winner detection,
//!   the shared finish line). Display happens through sink traits only.
//! - **[`io`]**: Side-effecting pieces (TOML config, terminal rendering).
//!
//! [`run`] owns the timer and coordinates core logic with I/O to implement the
//! CLI and the browser server.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
