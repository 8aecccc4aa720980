// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Failures while loading fleet settings.

use std::path::PathBuf;
use thiserror::Error;

/// Why a settings file (or its environment overrides) could not be turned
/// into a usable [`FleetConfig`](crate::FleetConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file was read but its content is not valid for its format.
    #[error("cannot parse {path}: {message}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A setting holds a value the server cannot run with.
    #[error("{field}: {message}")]
    Validation {
        /// Dotted setting name, e.g. `auth.jwt_secret`.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The file exists but could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// Nothing exists at the given path.
    #[error("configuration file {path} does not exist")]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// An override variable is set to something unusable.
    #[error("environment variable {name}: {message}")]
    InvalidEnvVar {
        /// Variable name as read.
        name: String,
        /// What is wrong with its value.
        message: String,
    },

    /// A numeric setting falls outside its accepted bounds.
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        /// Dotted setting name.
        field: String,
        /// Rejected value.
        value: String,
        /// Lowest accepted value.
        min: String,
        /// Highest accepted value.
        max: String,
    },

    /// The file extension maps to no supported format.
    #[error("unsupported configuration format '{format}' (expected yaml, yml, toml or json)")]
    UnsupportedFormat {
        /// Extension as found.
        format: String,
    },

    /// Deserializing into the settings schema failed.
    #[error("malformed configuration: {message}")]
    Serialization {
        /// Deserializer diagnostic.
        message: String,
    },
}

impl ConfigError {
    /// Parse failure in `path`.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Rejected setting value.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Read failure for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Missing file.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Unusable override variable.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Range violation for a numeric setting; bounds are inclusive.
    pub fn out_of_range<T: std::fmt::Display>(
        field: impl Into<String>,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Unknown file extension.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Schema mismatch.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// The file could not be opened or read.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::FileNotFound { .. })
    }

    /// The file was readable but its content is unusable.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. }
                | Self::Validation { .. }
                | Self::OutOfRange { .. }
                | Self::Serialization { .. }
        )
    }

    /// Short label for the `error.kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse { .. } | Self::Serialization { .. } => "parse",
            Self::Validation { .. } | Self::OutOfRange { .. } => "invalid_value",
            Self::Io { .. } | Self::FileNotFound { .. } => "unreadable",
            Self::InvalidEnvVar { .. } => "environment",
            Self::UnsupportedFormat { .. } => "format",
        }
    }
}

/// Result alias for settings loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
