// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use fleet_config::FleetConfig;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Secrets shorter than this are accepted but flagged.
const RECOMMENDED_SECRET_LEN: usize = 32;

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    if !config_path.exists() {
        return Err(BinError::config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = fleet_config::load_config(config_path)
        .map_err(|e| BinError::from(e).with_context("Configuration validation failed"))?;

    let warnings = collect_warnings(&config);
    let redacted = redacted_config(&config)?;

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Listen: {}", config.server.socket_addr());
            println!("  Base path: {}", config.server.base_path);
            println!("  Token TTL: {}s", config.auth.token_ttl_secs);
            println!("  bcrypt cost: {}", config.auth.bcrypt_cost);
            println!(
                "  CORS origins: {}",
                if config.cors.allowed_origins.is_empty() {
                    "(none)".to_string()
                } else {
                    config.cors.allowed_origins.join(", ")
                }
            );
            println!(
                "  Logging: {} ({})",
                config.logging.level.as_str(),
                config.logging.format.as_str()
            );

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", to_pretty_json(&redacted)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "listen": config.server.socket_addr().to_string(),
                    "base_path": config.server.base_path,
                    "token_ttl_secs": config.auth.token_ttl_secs,
                    "bcrypt_cost": config.auth.bcrypt_cost,
                    "cors_origins": config.cors.allowed_origins,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&redacted) } else { None },
            });
            println!("{}", to_pretty_json(&output)?);
        }
    }

    Ok(())
}

/// Flags settings that are valid but unwise.
fn collect_warnings(config: &FleetConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(secret) = &config.auth.jwt_secret {
        if secret.expose().len() < RECOMMENDED_SECRET_LEN {
            warnings.push(format!(
                "JWT secret is shorter than {} bytes",
                RECOMMENDED_SECRET_LEN
            ));
        }
    }

    if config.cors.allowed_origins.iter().any(|o| o == "*") {
        warnings.push("CORS allows any origin".to_string());
    }

    if config.auth.bcrypt_cost < fleet_config::schema::DEFAULT_BCRYPT_COST {
        warnings.push(format!(
            "bcrypt cost {} is below the default of {}",
            config.auth.bcrypt_cost,
            fleet_config::schema::DEFAULT_BCRYPT_COST
        ));
    }

    warnings
}

/// Serializes the configuration with the signing secret masked.
fn redacted_config(config: &FleetConfig) -> BinResult<serde_json::Value> {
    let mut value = serde_json::to_value(config)
        .map_err(|e| BinError::runtime(format!("Failed to serialize configuration: {}", e)))?;

    if let Some(secret) = value
        .get_mut("auth")
        .and_then(|auth| auth.get_mut("jwt_secret"))
    {
        if !secret.is_null() {
            *secret = serde_json::Value::String("***".to_string());
        }
    }

    Ok(value)
}

fn to_pretty_json(value: &serde_json::Value) -> BinResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| BinError::runtime(format!("Failed to render output: {}", e)))
}
