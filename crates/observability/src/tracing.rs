//! Subscriber installation.

use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_FILTER, LogConfig, LogFormat};

/// Install the global subscriber described by `config`.
///
/// Returns `false` when a subscriber was already installed (the call is then
/// a no-op). Invalid filter directives fall back to `info`.
pub fn init_with(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.is_ok()
}
