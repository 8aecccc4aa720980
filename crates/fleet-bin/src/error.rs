// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Failures surfaced by the `fleet` command line.
//!
//! Every failure maps onto a process exit code so scripts driving the binary
//! can tell a bad config file apart from a server that failed to bind.

use thiserror::Error;

/// Result alias used across the binary.
pub type BinResult<T> = Result<T, BinError>;

/// Exit code table. Zero is reserved for success.
mod code {
    pub const CONFIG: i32 = 1;
    pub const STARTUP: i32 = 2;
    pub const SERVER: i32 = 3;
    pub const IO: i32 = 4;
    pub const API: i32 = 5;
    pub const AUTH: i32 = 6;
}

/// A failure while running a `fleet` subcommand.
#[derive(Debug, Error)]
pub enum BinError {
    /// Settings were missing or inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Something failed before the server could start (logging, bind).
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// The running server or a command failed.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Reading stdin, files or sockets failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Raised by the HTTP layer.
    #[error(transparent)]
    Api(#[from] fleet_api::ApiError),

    /// Raised while loading or validating the settings file.
    #[error("invalid settings: {0}")]
    Settings(#[from] fleet_config::ConfigError),

    /// Raised by password hashing or token handling.
    #[error("credential failure: {0}")]
    Auth(#[from] fleet_auth::AuthError),

    /// Another failure annotated with what was being attempted.
    #[error("{context}: {source}")]
    WithContext {
        /// What the command was doing.
        context: String,
        /// What went wrong.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Settings problem.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Startup problem.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Failure after startup.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Stream or file problem.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Wraps `self` with a description of the step that failed.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Process exit code for this failure. Context wrappers defer to the
    /// error they wrap.
    pub fn exit_code(&self) -> i32 {
        let mut current = self;
        while let Self::WithContext { source, .. } = current {
            current = source;
        }
        match current {
            Self::Configuration(_) | Self::Settings(_) => code::CONFIG,
            Self::Initialization(_) => code::STARTUP,
            Self::Runtime(_) => code::SERVER,
            Self::Io(_) => code::IO,
            Self::Api(_) => code::API,
            Self::Auth(_) => code::AUTH,
            Self::WithContext { .. } => code::SERVER,
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Prints the failure and each of its causes to stderr.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error);

    let mut cause = std::error::Error::source(error);
    while let Some(inner) = cause {
        eprintln!("  Caused by: {}", inner);
        cause = inner.source();
    }
}

/// Prints the failure, then terminates with its exit code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}
