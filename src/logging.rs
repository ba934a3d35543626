//! Tracing subscriber setup.
//!
//! Log lines go to stderr so stdout stays clean for the rendered note or JSON.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for the given CLI verbosity.
pub fn filter_directive(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the CLI flags when set. Calling this twice is harmless:
/// the second attempt is ignored.
pub fn init(quiet: bool, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(quiet, verbose)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
