//! Diagnostics for the `race` binary.
//!
//! Tracing goes to stderr and never mixes with the track and the results,
//! which `io::terminal` writes to stdout regardless of the filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
///
/// `verbose` reports race start, finish and resizes; otherwise only warnings.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "warn,race=info" } else { "warn" }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `verbose`.
///
/// ```bash
/// RUST_LOG=race=debug race run   # one line per tick
/// ```
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
