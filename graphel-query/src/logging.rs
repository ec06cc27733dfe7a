//! Logging infrastructure.
//!
//! Structured logging controlled by the `GRAPHEL_DEBUG` environment variable.
//!
//! # Environment Variables
//!
//! - `GRAPHEL_DEBUG=true` - Enable debug logging
//! - `GRAPHEL_LOG_LEVEL=debug|info|warn|error|trace` - Set a specific log level
//! - `GRAPHEL_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use graphel_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! Per-exchange debug dumps (the rendered document, bound variables, and the
//! result or error) are emitted through [`log_exchange`] when a builder has
//! its `debug` flag set. The call sites are compiled out of release builds,
//! so the dumps can never fire in production regardless of the flag.

use std::env;
use std::sync::Once;

use serde_json::Value;

use crate::error::QueryError;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via the `GRAPHEL_DEBUG` environment variable.
///
/// Returns `true` if `GRAPHEL_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("GRAPHEL_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from the `GRAPHEL_LOG_LEVEL` environment variable.
///
/// Defaults to "debug" if `GRAPHEL_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    if let Ok(level) = env::var("GRAPHEL_LOG_LEVEL") {
        match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => {
                if is_debug_enabled() {
                    "debug"
                } else {
                    "warn"
                }
            }
        }
    } else if is_debug_enabled() {
        "debug"
    } else {
        "warn"
    }
}

/// Get the configured log format from the `GRAPHEL_LOG_FORMAT` environment variable.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("GRAPHEL_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the logging system.
///
/// This should be called once at application startup. Subsequent calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("GRAPHEL_LOG_LEVEL").is_err() {
            // No logging requested, skip initialization
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter =
                EnvFilter::try_new(format!("graphel_query={level},graphel_client={level}"))
                    .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            tracing::info!(
                level = level,
                format = get_log_format(),
                "Graphel logging initialized"
            );
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            // Tracing subscriber not available, logging will be silent
            // unless the user sets up their own subscriber
        }
    });
}

/// Dump one request/response exchange at debug level.
///
/// Called by the builder when its `debug` flag is set, behind a
/// `debug_assertions` gate at the call site.
pub fn log_exchange(document: &str, variables: &Value, outcome: Result<&Value, &QueryError>) {
    match outcome {
        Ok(result) => tracing::debug!(
            document = %document,
            variables = %variables,
            result = %result,
            "graphql exchange"
        ),
        Err(error) => tracing::debug!(
            document = %document,
            variables = %variables,
            error = %error,
            "graphql exchange failed"
        ),
    }
}
