//! Tracing subscriber bootstrap for tests and tools built on the testkit.
//!
//! The core only emits `tracing` events; whoever runs it decides where they
//! go. This module installs a stderr subscriber, filtered by `RUST_LOG`,
//! printing either readable lines or JSON.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// `"json"` in any case selects [`LogFormat::Json`]; anything else is pretty.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Installs the global subscriber.
///
/// `default_level` is an `EnvFilter` directive such as
/// `"algosdk_core=debug,algosdk_testkit=info"`, used when `RUST_LOG` is
/// unset. Fails if a subscriber is already installed in this process.
pub fn init_logging(
    default_level: &str,
    format: LogFormat,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr).with_target(true))
                .try_init()?;
        }
    }

    tracing::debug!(?format, "tracing subscriber installed");
    Ok(())
}

/// Installs a debug-level pretty subscriber for tests, once per binary.
/// Later calls are no-ops.
pub fn init_test_logging() {
    let format = std::env::var("ALGOSDK_LOG_FORMAT")
        .map(|f| LogFormat::from_str_lossy(&f))
        .unwrap_or(LogFormat::Pretty);
    let _ = init_logging("algosdk_core=debug,algosdk_testkit=debug", format);
}
