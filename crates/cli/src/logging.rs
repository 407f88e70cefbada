//! Log initialisation for the `appraise` binary.
//!
//! Library crates only emit `tracing` events; this is the one place a
//! subscriber is installed. Logs go to stderr so stdout stays parseable.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive; wins over everything.
pub const LOG_ENV: &str = "APPRAISE_LOG";

/// Filter when neither the environment, `-v` nor the config file set one.
const DEFAULT_LEVEL: &str = "warn";

fn fallback_directive(verbose: u8, configured: Option<&str>) -> String {
    match verbose {
        0 => configured.unwrap_or(DEFAULT_LEVEL).to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

pub fn init_logging(verbose: u8, configured: Option<&str>) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(fallback_directive(verbose, configured)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
