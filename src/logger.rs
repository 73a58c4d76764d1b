//! Diagnostic logging.
//!
//! Logs go to stderr through `tracing-subscriber`. The filter comes from
//! `RUST_LOG` when it is set and valid, otherwise from the `--log-level`
//! option. The default level is `warn`, so a normal session shows only the
//! interpreter's own error messages:
//! - `RUST_LOG=debug` - every dispatch, fork and wait status
//! - `RUST_LOG=trace` - everything

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter, preferring `RUST_LOG` over `default_filter`.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(stderr_layer)
        .try_init()?;

    tracing::debug!("logging initialized");
    Ok(())
}
