//! Logging setup

use anyhow::Result;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to `default_level`
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global `fmt` subscriber writing to `writer`.
///
/// `log` records are forwarded into the same subscriber; teloxide logs
/// dispatcher and handler errors through `log`.
pub fn init_logger<W>(filter: EnvFilter, writer: W) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}
