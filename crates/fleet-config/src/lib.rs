// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # fleet-config
//!
//! Configuration management for the fleet server.
//!
//! ## Features
//!
//! - **Schema Definition**: server, auth, CORS and logging sections with validation
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `FLEET_*` variables plus the conventional `PORT` and `JWT_SECRET`
//! - **Secret Redaction**: the signing secret never shows up in `Debug` output
//!
//! ## Quick Start
//!
//! ```no_run
//! use fleet_config::loader::load_config;
//!
//! let config = load_config("fleet.yaml").unwrap();
//! println!("Listening on {}", config.server.socket_addr());
//! ```
//!
//! Values in config files can reference environment variables:
//!
//! ```yaml
//! auth:
//!   jwt_secret: "${JWT_SECRET}"
//! server:
//!   port: ${PORT:8000}
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    AuthConfig, CorsConfig, FleetConfig, LogFormat, LogLevel, LoggingConfig, SecretValue,
    ServerConfig,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(NAME, "fleet-config");
        assert!(!VERSION.is_empty());
    }
}
