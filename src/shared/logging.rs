//! Structured logging setup.
//!
//! Library code only emits `tracing` events; the binary installs the
//! subscriber once. Events go to stderr so that stdout stays usable for
//! JSON output.

use anyhow::Context;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::shared::Result;

/// Initializes the global subscriber.
///
/// `level` is an `EnvFilter` directive (e.g. `info`, `openlcs=debug`). When it
/// is `None` the `RUST_LOG` environment variable is used, falling back to
/// `warn`.
pub fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log level directive: {}", directive))?,
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .context("error initializing logging")?;

    Ok(())
}
