//! Tracing initialization shared by the netinspect binaries
//!
//! Logs go to stderr: stdout carries JSON output (CLI) or the MCP protocol.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence; otherwise events from `crate_name` and from
/// this library are shown at the configured level.
pub fn init_tracing(crate_name: &str, config: &LoggingConfig) -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(crate_name, config, rust_log.as_deref())?;

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init(),
    }

    Ok(())
}

/// `rust_log` when set and valid, else the configured level for our targets
fn env_filter(
    crate_name: &str,
    config: &LoggingConfig,
    rust_log: Option<&str>,
) -> anyhow::Result<EnvFilter> {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok(filter),
            Err(e) => eprintln!("Ignoring invalid RUST_LOG {:?}: {}", directives, e),
        }
    }

    let defaults = format!(
        "{}={level},{}={level}",
        crate_name,
        env!("CARGO_CRATE_NAME"),
        level = config.level
    );
    Ok(EnvFilter::try_new(defaults)?)
}
