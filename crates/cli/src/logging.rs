// Logging init
//
// Library crates log through the `log` facade; the subscriber's
// tracing-log bridge picks those records up. Output goes to stderr so
// `--json` stdout stays parseable.

use tracing_subscriber::{fmt, EnvFilter};

/// Level for a given `-v` count when `RUST_LOG` is unset.
pub fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `-v`.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
