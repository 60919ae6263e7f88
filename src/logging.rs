//! Log setup.
//!
//! Library code logs through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter on stderr; its default `tracing-log` bridge
//! forwards `log` records into it. The filter comes from `RUST_LOG`
//! (optionally set in a `.env` file) and defaults to `warn`, which keeps the
//! interactive view free of log noise.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Calling it twice is harmless.
pub fn init() {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
