// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for the fleet server.
//!
//! # Schema Structure
//!
//! ```text
//! FleetConfig
//! ├── server: ServerConfig
//! ├── auth: AuthConfig
//! ├── cors: CorsConfig
//! └── logging: LoggingConfig
//! ```

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

// =============================================================================
// Constants
// =============================================================================

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default token lifetime in seconds (8 hours).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 8 * 60 * 60;

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Lowest bcrypt work factor accepted.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest bcrypt work factor accepted.
pub const MAX_BCRYPT_COST: u32 = 31;

/// Default maximum request body size (16KB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure of the fleet server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FleetConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Token and password settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// CORS settings.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FleetConfig {
    /// Validates the whole configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.auth.validate()?;
        self.cors.validate()?;
        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base path for API routes.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub shutdown_timeout_secs: u64,

    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_base_path() -> String {
    "/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

impl ServerConfig {
    /// Validates the server configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::validation("server.port", "cannot be zero"));
        }
        if !self.base_path.starts_with('/') {
            return Err(ConfigError::validation(
                "server.base_path",
                "must start with '/'",
            ));
        }
        if self.base_path.trim_end_matches('/').is_empty() {
            return Err(ConfigError::validation(
                "server.base_path",
                "cannot be the root path",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout_secs",
                "cannot be zero",
            ));
        }
        if self.max_body_size == 0 {
            return Err(ConfigError::validation(
                "server.max_body_size",
                "cannot be zero",
            ));
        }
        Ok(())
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the shutdown timeout as a Duration.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            base_path: default_base_path(),
            request_timeout_secs: default_timeout_secs(),
            shutdown_timeout_secs: default_timeout_secs(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

// =============================================================================
// Auth Configuration
// =============================================================================

/// Token and password configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Token signing secret. Required to run the server.
    #[serde(default)]
    pub jwt_secret: Option<SecretValue>,

    /// Token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// Token issuer.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// bcrypt work factor for new passwords.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_token_ttl() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

fn default_issuer() -> String {
    "fleet".to_string()
}

fn default_bcrypt_cost() -> u32 {
    DEFAULT_BCRYPT_COST
}

impl AuthConfig {
    /// Validates the auth configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        match &self.jwt_secret {
            None => {
                return Err(ConfigError::validation(
                    "auth.jwt_secret",
                    "is required (set FLEET_JWT_SECRET or JWT_SECRET)",
                ))
            }
            Some(secret) if secret.is_empty() => {
                return Err(ConfigError::validation("auth.jwt_secret", "cannot be empty"))
            }
            Some(_) => {}
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::validation(
                "auth.token_ttl_secs",
                "cannot be zero",
            ));
        }
        if self.issuer.is_empty() {
            return Err(ConfigError::validation("auth.issuer", "cannot be empty"));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::out_of_range(
                "auth.bcrypt_cost",
                self.bcrypt_cost,
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST,
            ));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            issuer: default_issuer(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

// =============================================================================
// CORS Configuration
// =============================================================================

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (use "*" for all).
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,

    /// Allowed methods.
    #[serde(default = "default_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed headers.
    #[serde(default = "default_headers")]
    pub allowed_headers: Vec<String>,

    /// Allow credentials.
    #[serde(default = "default_allow_credentials")]
    pub allow_credentials: bool,

    /// Max age in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

fn default_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_headers() -> Vec<String> {
    vec!["Content-Type".to_string(), "Authorization".to_string()]
}

fn default_allow_credentials() -> bool {
    true
}

fn default_max_age() -> u64 {
    3600
}

impl CorsConfig {
    /// Validates the CORS configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.allowed_origins.iter().any(|o| o.trim().is_empty()) {
            return Err(ConfigError::validation(
                "cors.allowed_origins",
                "cannot contain an empty origin",
            ));
        }
        if self.allowed_methods.is_empty() {
            return Err(ConfigError::validation(
                "cors.allowed_methods",
                "cannot be empty",
            ));
        }
        Ok(())
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_origins(),
            allowed_methods: default_methods(),
            allowed_headers: default_headers(),
            allow_credentials: true,
            max_age_secs: default_max_age(),
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Single-line compact text.
    Compact,
    /// JSON format for production.
    Json,
}

impl LogFormat {
    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret string whose `Debug` and `Display` never show the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret itself.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretValue(***)")
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***")
    }
}
