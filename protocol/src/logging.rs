//! # Structured Logging
//!
//! The engines take a [`Logger`] at construction instead of reaching for a
//! global, so an embedding SDK can route ILP and signing diagnostics wherever
//! its own request logs go. [`TracingLogger`] is the stock implementation and
//! simply emits `tracing` events.
//!
//! Logging is a side channel only. [`Logger::log`] returns nothing, and no
//! engine ever branches on whether a log line was written.
//!
//! Key material, secrets and fulfilments are never passed to a logger.

use std::fmt;

use tracing::Level;
use tracing_subscriber::{fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Sink for engine diagnostics.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }
}

/// Forwards every message to `tracing` with a `component` field.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: String,
}

impl TracingLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("fspiop")
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        let component = self.component.as_str();
        // `tracing` needs the level at compile time.
        match level {
            Level::ERROR => tracing::error!(component, "{}", message),
            Level::WARN => tracing::warn!(component, "{}", message),
            Level::INFO => tracing::info!(component, "{}", message),
            Level::DEBUG => tracing::debug!(component, "{}", message),
            Level::TRACE => tracing::trace!(component, "{}", message),
        }
    }
}

impl fmt::Debug for dyn Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Logger")
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output for local development.
    Pretty,
    /// JSON lines for log aggregation.
    Json,
}

impl LogFormat {
    /// Accepts "json" or "pretty" (case-insensitive). Anything else is `Pretty`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global tracing subscriber for a binary embedding this crate.
///
/// `RUST_LOG` overrides `default_level` when set, e.g.
///
/// ```text
/// RUST_LOG=fspiop_protocol=debug
/// ```
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(default_level: &str, format: LogFormat) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt_layer::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
            .is_ok(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer::layer().json().with_target(true))
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::info!("logging initialized (format={:?})", format);
    }
    installed
}
