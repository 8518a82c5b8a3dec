use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

pub const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Logs go to stderr so they never mix with
/// shell output or CSV written to stdout.
///
/// An unparsable filter falls back to `warn`. Safe to call more than once.
pub fn init_tracing(filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
