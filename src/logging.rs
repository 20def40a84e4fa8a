//! Diagnostic logging setup
//!
//! Uses `tracing` with an env-filter. Logs go to stderr so command output on
//! stdout stays clean for piping.
//!
//! - `COSTSHARE_LOG` (or `RUST_LOG`) overrides the level, e.g.
//!   `COSTSHARE_LOG=costshare_cli=debug`
//! - without it the level is `warn`, or `debug` with `--verbose`

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "COSTSHARE_LOG";

/// Initialize the global subscriber for the CLI
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_line_number(verbose)
        .try_init();
}

/// Subscriber for tests, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
