// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # fleet-bin
//!
//! CLI binary for the fleet management API server.
//!
//! - CLI argument parsing with clap
//! - Server runtime orchestration
//! - Graceful shutdown handling
//! - Logging initialization
//! - Command implementations (run, validate, version, hash-password)
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! fleet
//!
//! # Start with a custom config and port
//! fleet -c /etc/fleet/fleet.yaml run --port 9000
//!
//! # Validate configuration
//! fleet validate --show-config
//!
//! # Hash a password for seeding an account
//! echo -n 'hunter22' | fleet hash-password --stdin
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{FleetRuntime, RuntimeBuilder};
pub use shutdown::{ShutdownCoordinator, ShutdownToken};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
