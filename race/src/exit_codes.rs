//! Stable exit codes for race CLI commands.

/// Command succeeded (every requested race produced a winner).
pub const OK: i32 = 0;
/// Command failed due to an invalid config or another error.
pub const INVALID: i32 = 1;
