// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading and processing.
//!
//! # Loading Pipeline
//!
//! 1. Read the YAML/TOML/JSON file
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw text
//! 3. Parse into [`FleetConfig`]
//! 4. Apply environment variable overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! FLEET_SERVER_HOST=127.0.0.1
//! FLEET_SERVER_PORT=9000      (PORT is honoured when this is unset)
//! FLEET_JWT_SECRET=...        (JWT_SECRET is honoured when this is unset)
//! FLEET_LOG_LEVEL=debug
//! FLEET_LOG_FORMAT=json
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{FleetConfig, LogFormat, LogLevel, SecretValue};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use fleet_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("fleet.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply overrides.
    resolve_env_vars: bool,

    /// Fixed variables used instead of the process environment.
    env_snapshot: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: "FLEET".to_string(),
            resolve_env_vars: true,
            env_snapshot: None,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Reads variables from the given pairs instead of the process
    /// environment.
    pub fn with_env_snapshot<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env_snapshot = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format is determined by the file extension (`.yaml`, `.yml`,
    /// `.toml`, `.json`).
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<FleetConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;

        let config = self.process(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        info!("Configuration loaded successfully");
        debug!(
            addr = %config.server.socket_addr(),
            base_path = %config.server.base_path,
            "Server settings"
        );

        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<FleetConfig> {
        self.process(content, format)
    }

    /// Builds configuration from defaults and the environment alone.
    ///
    /// Used when no configuration file exists.
    pub fn load_defaults(&self) -> ConfigResult<FleetConfig> {
        let mut config = FleetConfig::default();
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn process(&self, content: &str, format: ConfigFormat) -> ConfigResult<FleetConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        let mut config = parse_str(&content, format)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Reads file content.
    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    /// Looks up a variable, treating empty values as unset.
    fn var(&self, name: &str) -> Option<String> {
        let value = match &self.env_snapshot {
            Some(vars) => vars.get(name).cloned(),
            None => env::var(name).ok(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Resolves environment variable placeholders in content.
    ///
    /// Supports `${VAR_NAME}` and `${VAR_NAME:default}`. Unknown variables
    /// without a default are left in place.
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next(); // consume '{'

            let mut var_content = String::new();
            let mut found_close = false;
            for c in chars.by_ref() {
                if c == '}' {
                    found_close = true;
                    break;
                }
                var_content.push(c);
            }

            if !found_close {
                result.push_str("${");
                result.push_str(&var_content);
                continue;
            }

            let (var_name, default_value) = match var_content.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (var_content.as_str(), None),
            };

            match (self.var(var_name), default_value) {
                (Some(value), _) => result.push_str(&value),
                (None, Some(default)) => result.push_str(default),
                (None, None) => {
                    warn!("Environment variable '{}' not found", var_name);
                    result.push_str(&format!("${{{}}}", var_name));
                }
            }
        }

        result
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut FleetConfig) -> ConfigResult<()> {
        let prefixed = |key: &str| format!("{}_{}", self.env_prefix, key);

        let host_var = prefixed("SERVER_HOST");
        if let Some(value) = self.var(&host_var) {
            config.server.host = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(&host_var, "expected IP address"))?;
        }

        let port_var = prefixed("SERVER_PORT");
        let port = self
            .var(&port_var)
            .map(|v| (port_var.clone(), v))
            .or_else(|| self.var("PORT").map(|v| ("PORT".to_string(), v)));
        if let Some((name, value)) = port {
            config.server.port = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected valid port number"))?;
        }

        if let Some(value) = self
            .var(&prefixed("JWT_SECRET"))
            .or_else(|| self.var("JWT_SECRET"))
        {
            config.auth.jwt_secret = Some(SecretValue::new(value));
        }

        let level_var = prefixed("LOG_LEVEL");
        if let Some(value) = self.var(&level_var) {
            config.logging.level = LogLevel::parse(&value)
                .ok_or_else(|| ConfigError::invalid_env_var(&level_var, "unknown log level"))?;
        }

        let format_var = prefixed("LOG_FORMAT");
        if let Some(value) = self.var(&format_var) {
            config.logging.format = parse_log_format(&value)
                .ok_or_else(|| ConfigError::invalid_env_var(&format_var, "unknown log format"))?;
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<FleetConfig> {
    match format {
        ConfigFormat::Yaml => {
            // An empty YAML document means "all defaults".
            if content.trim().is_empty() {
                return Ok(FleetConfig::default());
            }
            serde_yaml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

fn parse_log_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "text" | "pretty" => Some(LogFormat::Text),
        "compact" => Some(LogFormat::Compact),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
///
/// # Examples
///
/// ```no_run
/// use fleet_config::loader::load_config;
///
/// let config = load_config("fleet.yaml").unwrap();
/// ```
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<FleetConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<FleetConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const NO_ENV: [(&str, &str); 0] = [];

    fn create_test_yaml() -> String {
        r#"
server:
  port: 9100
  base_path: /api/v2

auth:
  jwt_secret: "${FLEET_TEST_SECRET:fallback-secret-that-is-long-enough}"
  bcrypt_cost: 12

logging:
  level: debug
  format: json
"#
        .to_string()
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(create_test_yaml().as_bytes()).unwrap();

        let config = ConfigLoader::new()
            .with_env_snapshot(NO_ENV)
            .load(file.path())
            .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.base_path, "/api/v2");
        assert_eq!(config.auth.bcrypt_cost, 12);
        assert_eq!(
            config.auth.jwt_secret.unwrap().expose(),
            "fallback-secret-that-is-long-enough"
        );
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
[server]
port = 8200

[auth]
jwt_secret = "toml-secret"
"#;
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let config = ConfigLoader::new()
            .with_env_snapshot(NO_ENV)
            .load(file.path())
            .unwrap();
        assert_eq!(config.server.port, 8200);
        assert_eq!(config.auth.token_ttl_secs, 28_800);
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("fleet.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("fleet.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("fleet.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("fleet.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("fleet.txt")).is_err());
        assert!(ConfigFormat::from_path(Path::new("fleet")).is_err());
    }

    #[test]
    fn test_env_placeholder_resolution() {
        let loader = ConfigLoader::new().with_env_snapshot([("SECRET", "abc")]);
        assert_eq!(loader.resolve_env_placeholders("value: ${SECRET}"), "value: abc");
        assert_eq!(
            loader.resolve_env_placeholders("value: ${MISSING:default}"),
            "value: default"
        );
        assert_eq!(
            loader.resolve_env_placeholders("value: ${MISSING}"),
            "value: ${MISSING}"
        );
        assert_eq!(loader.resolve_env_placeholders("cost: $5 ${"), "cost: $5 ${");
    }

    #[test]
    fn test_env_overrides() {
        let loader = ConfigLoader::new().with_env_snapshot([
            ("FLEET_SERVER_HOST", "127.0.0.1"),
            ("FLEET_SERVER_PORT", "9300"),
            ("PORT", "1"),
            ("JWT_SECRET", "plain-secret"),
            ("FLEET_LOG_LEVEL", "warn"),
        ]);

        let config = loader.load_defaults().unwrap();
        assert_eq!(config.server.socket_addr().to_string(), "127.0.0.1:9300");
        assert_eq!(config.auth.jwt_secret.unwrap().expose(), "plain-secret");
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_conventional_port_and_prefixed_secret() {
        let loader = ConfigLoader::new().with_env_snapshot([
            ("PORT", "5000"),
            ("JWT_SECRET", "plain-secret"),
            ("FLEET_JWT_SECRET", "prefixed-secret"),
        ]);

        let config = loader.load_defaults().unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.jwt_secret.unwrap().expose(), "prefixed-secret");
    }

    #[test]
    fn test_invalid_env_override() {
        let loader = ConfigLoader::new()
            .with_env_snapshot([("JWT_SECRET", "s"), ("FLEET_SERVER_PORT", "eighty")]);
        assert!(matches!(
            loader.load_defaults(),
            Err(ConfigError::InvalidEnvVar { .. })
        ));
    }

    #[test]
    fn test_defaults_without_secret_fail() {
        let loader = ConfigLoader::new().with_env_snapshot(NO_ENV);
        assert!(matches!(
            loader.load_defaults(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(b"server:\n  prot: 1\n").unwrap();

        let result = ConfigLoader::new().with_env_snapshot(NO_ENV).load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_from_str_without_env() {
        let loader = ConfigLoader::new().with_env_vars(false);
        let config = loader
            .load_from_str(r#"{"auth": {"jwt_secret": "${NOT_RESOLVED}"}}"#, ConfigFormat::Json)
            .unwrap();
        assert_eq!(config.auth.jwt_secret.unwrap().expose(), "${NOT_RESOLVED}");
    }

    #[test]
    fn test_file_not_found() {
        let result = ConfigLoader::new().load("/nonexistent/path/fleet.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!(parse_log_format("JSON"), Some(LogFormat::Json));
        assert_eq!(parse_log_format("pretty"), Some(LogFormat::Text));
        assert_eq!(parse_log_format("xml"), None);
    }
}
