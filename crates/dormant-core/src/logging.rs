//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events; binaries and tests decide
//! where they go by calling [`init_tracing`] once.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install a global `fmt` subscriber for `config`.
///
/// `RUST_LOG` takes precedence over `config.level`; an unparsable level
/// falls back to `info`. Returns `false` if a global subscriber was already
/// installed, which makes repeated calls from tests harmless.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.is_ok()
}
