// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use tracing::info;

use crate::cli::{Cli, RunArgs};
use crate::error::BinResult;
use crate::logging::init_logging;
use crate::runtime::{load_or_defaults, RuntimeBuilder};

/// Executes the `run` command to start the server.
pub async fn run(cli: &Cli, args: RunArgs) -> BinResult<()> {
    let config = load_or_defaults(&cli.config)?;

    init_logging(
        cli.effective_log_level(config.logging.level.as_str()),
        cli.effective_log_format(config.logging.format),
    )?;
    info!(config = %cli.config.display(), "Configuration resolved");

    let runtime = RuntimeBuilder::new()
        .config(config)
        .port(args.port)
        .build()?;

    runtime.run().await
}
