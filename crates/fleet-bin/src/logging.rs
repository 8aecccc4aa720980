// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging and tracing initialization.

use fleet_config::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{BinError, BinResult};

/// Noisy dependencies are capped regardless of the requested level.
const DEPENDENCY_DIRECTIVES: &str = "hyper=warn,tower=warn,tower_http=info,axum=info,tokio=info";

// =============================================================================
// Logging Initialization
// =============================================================================

/// Initializes the logging subsystem.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
///
/// # Example
///
/// ```ignore
/// use fleet_bin::logging::init_logging;
/// use fleet_config::LogFormat;
///
/// init_logging("info", LogFormat::Text)?;
/// ```
pub fn init_logging(level: &str, format: LogFormat) -> BinResult<()> {
    let env_filter = build_filter(level)?;

    let result = match format {
        LogFormat::Text => {
            let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(true).with_ansi(is_terminal))
                .try_init()
        }
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_current_span(true),
            )
            .try_init(),
        LogFormat::Compact => {
            let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_ansi(is_terminal),
                )
                .try_init()
        }
    };

    result.map_err(|e| BinError::init(format!("Failed to initialize logging: {}", e)))
}

/// Builds the filter from `RUST_LOG` or the given level.
fn build_filter(level: &str) -> BinResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = normalize_level(level)
        .ok_or_else(|| BinError::config(format!("Unknown log level '{}'", level)))?;

    EnvFilter::try_new(format!("{},{}", level, DEPENDENCY_DIRECTIVES))
        .map_err(|e| BinError::init(format!("Invalid log filter: {}", e)))
}

/// Maps a user-supplied level name to a filter directive.
pub fn normalize_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
