//! Diagnostic logging
//!
//! `tracing` events go to stderr so they never mix with command output on
//! stdout. `KCL_LOG` takes an `EnvFilter` directive; without it `--verbose`
//! selects `debug` and everything else stays at `warn`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "KCL_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

pub fn init(verbose: bool) {
    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
