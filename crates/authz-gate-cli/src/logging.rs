// crates/authz-gate-cli/src/logging.rs
// ============================================================================
// Module: Logging Setup
// Description: tracing-subscriber installation for the CLI process.
// Purpose: Route structured logs to stderr with an env-controlled filter.
// Dependencies: thiserror, tracing-subscriber
// ============================================================================

//! ## Overview
//! Logs go to stderr so command output on stdout stays machine-readable.
//! The filter comes from [`LOG_ENV_VAR`] and falls back to
//! [`DEFAULT_LOG_FILTER`] when unset or unparsable.

use thiserror::Error;
use tracing_subscriber::EnvFilter;


/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "AUTHZ_GATE_LOG";
/// Filter used when [`LOG_ENV_VAR`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Subscriber installation failure.
#[derive(Debug, Error)]
#[error("logging init failed: {0}")]
pub struct LoggingError(String);

/// Builds the event filter from an optional directive string.
#[must_use]
pub fn log_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] when a global subscriber is already set.
pub fn init_logging(format: LogFormat) -> Result<(), LoggingError> {
    let directive = std::env::var(LOG_ENV_VAR).ok();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter(directive.as_deref()))
        .with_writer(std::io::stderr);
    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|err| LoggingError(err.to_string()))
}
