// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: Start the API server (default)
//! - `validate`: Validate the configuration file
//! - `version`: Show version information
//! - `hash-password`: Print a bcrypt hash for seeding accounts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Fleet - fleet management API server
///
/// Serves officer signup and login plus the role-gated fleet record and
/// analytics endpoints.
#[derive(Parser, Debug)]
#[command(
    name = "fleet",
    author = "Sylvex <contact@sylvex.io>",
    version = crate::VERSION,
    about = "Fleet management API server",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "fleet.yaml",
        env = "FLEET_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, env = "FLEET_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact); overrides the config file
    #[arg(long, env = "FLEET_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the fleet CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server
    ///
    /// This is the default command when no subcommand is specified. Without a
    /// configuration file the server runs on defaults plus environment
    /// overrides.
    Run(RunArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration file without starting the server.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,

    /// Hash a password with bcrypt
    ///
    /// Prints a hash suitable for seeding officer accounts.
    #[command(name = "hash-password")]
    HashPassword(HashPasswordArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation (secret redacted)
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `hash-password` command.
#[derive(Args, Debug, Clone)]
pub struct HashPasswordArgs {
    /// Password to hash
    #[arg(required_unless_present = "stdin")]
    pub password: Option<String>,

    /// Read the password from stdin
    #[arg(long)]
    pub stdin: bool,

    /// bcrypt work factor (4..=31)
    #[arg(long, default_value_t = fleet_auth::DEFAULT_BCRYPT_COST)]
    pub cost: u32,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<LogFormat> for fleet_config::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Text => fleet_config::LogFormat::Text,
            LogFormat::Json => fleet_config::LogFormat::Json,
            LogFormat::Compact => fleet_config::LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Returns the log level to use, given the configured fallback.
    ///
    /// `--quiet` and `--verbose` win over `--log-level`, which wins over the
    /// configuration file.
    pub fn effective_log_level<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(configured)
        }
    }

    /// Returns the log format to use, given the configured fallback.
    pub fn effective_log_format(&self, configured: fleet_config::LogFormat) -> fleet_config::LogFormat {
        self.log_format.map(Into::into).unwrap_or(configured)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["fleet"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Run(_)));
    }

    #[test]
    fn test_run_with_port() {
        let cli = Cli::parse_from(["fleet", "run", "--port", "9000"]);
        match cli.command {
            Some(Commands::Run(args)) => assert_eq!(args.port, Some(9000)),
            other => panic!("Expected Run command, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["fleet", "validate", "--show-config", "-f", "json"]);
        match cli.command {
            Some(Commands::Validate(args)) => {
                assert!(args.show_config);
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("Expected Validate command, got {:?}", other),
        }
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["fleet", "-c", "/etc/fleet/fleet.toml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/fleet/fleet.toml"));
    }

    #[test]
    fn test_log_level_precedence() {
        let cli = Cli::parse_from(["fleet", "-l", "trace"]);
        assert_eq!(cli.effective_log_level("info"), "trace");

        let cli = Cli::parse_from(["fleet", "-l", "trace", "-q"]);
        assert_eq!(cli.effective_log_level("info"), "warn");

        let cli = Cli::parse_from(["fleet", "-v"]);
        assert_eq!(cli.effective_log_level("info"), "debug");
    }

    #[test]
    fn test_log_format_override() {
        let cli = Cli::parse_from(["fleet", "--log-format", "json"]);
        assert_eq!(
            cli.effective_log_format(fleet_config::LogFormat::Text),
            fleet_config::LogFormat::Json
        );
    }

    #[test]
    fn test_hash_password_command() {
        let cli = Cli::parse_from(["fleet", "hash-password", "hunter22", "--cost", "4"]);
        match cli.command {
            Some(Commands::HashPassword(args)) => {
                assert_eq!(args.password.as_deref(), Some("hunter22"));
                assert_eq!(args.cost, 4);
            }
            other => panic!("Expected HashPassword command, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_password_requires_input() {
        assert!(Cli::try_parse_from(["fleet", "hash-password"]).is_err());
    }
}
