// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `run`: Start the API server
//! - `validate`: Validate the configuration file
//! - `version`: Show version information
//! - `hash-password`: Hash a password with bcrypt

mod hash_password;
mod run;
mod validate;
mod version;

pub use hash_password::hash_password;
pub use run::run;
pub use validate::validate;
pub use version::version;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;
use crate::logging::init_logging;

/// Executes the appropriate command based on CLI arguments.
///
/// `run` initializes logging itself once the configuration is loaded; the
/// other commands log with the CLI settings only.
pub async fn execute(cli: Cli) -> BinResult<()> {
    let command = cli.effective_command();
    if !matches!(command, Commands::Run(_)) {
        init_logging(
            cli.effective_log_level("warn"),
            cli.effective_log_format(fleet_config::LogFormat::Text),
        )?;
    }

    match command {
        Commands::Run(args) => run::run(&cli, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Version => version::version(&cli),
        Commands::HashPassword(args) => hash_password::hash_password(&cli, args),
    }
}
