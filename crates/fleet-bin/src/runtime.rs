// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server runtime orchestration.
//!
//! Turns a loaded [`FleetConfig`] into the API server, runs it, and drives
//! graceful shutdown.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use fleet_api::{ApiConfig, ApiServer, ApiServerBuilder};
use fleet_auth::JwtConfig;
use fleet_config::{ConfigLoader, FleetConfig};
use tracing::{info, warn};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// FleetRuntime
// =============================================================================

/// The runtime that owns the configuration and the shutdown coordinator.
pub struct FleetRuntime {
    config: Arc<FleetConfig>,
    shutdown: ShutdownCoordinator,
}

impl FleetRuntime {
    /// Creates a new runtime.
    pub fn new(config: FleetConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Builds the API server from the configuration.
    pub fn build_server(&self) -> BinResult<ApiServer> {
        let api_config = api_config(&self.config)?;
        ApiServerBuilder::new()
            .config(api_config)
            .build()
            .map_err(|e| BinError::from(e).with_context("Failed to build API server"))
    }

    /// Runs the server until a shutdown signal arrives.
    ///
    /// In-flight requests get the configured shutdown timeout to finish.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting Fleet API server v{}", crate::VERSION);

        let server = self.build_server()?;
        let addr = server.addr();
        let signal = self.shutdown.shutdown_signal();
        let mut server_task = tokio::spawn(server.run_with_shutdown(signal));

        info!(
            %addr,
            base_path = %self.config.server.base_path,
            "Fleet API server is ready"
        );

        let grace = self.config.server.shutdown_timeout();

        tokio::select! {
            joined = &mut server_task => {
                // The server stopped on its own, usually a bind failure.
                self.shutdown.initiate_shutdown();
                return flatten(joined);
            }
            _ = self.shutdown.wait_for_shutdown() => {}
        }

        info!("Shutdown initiated, draining connections...");

        match tokio::time::timeout(grace, &mut server_task).await {
            Ok(joined) => flatten(joined)?,
            Err(_) => {
                warn!(
                    timeout_secs = grace.as_secs(),
                    "Server did not stop within the shutdown timeout"
                );
                server_task.abort();
            }
        }

        info!("Fleet API server shutdown complete");
        Ok(())
    }
}

fn flatten(
    joined: Result<fleet_api::ApiResult<()>, tokio::task::JoinError>,
) -> BinResult<()> {
    joined
        .map_err(|e| BinError::runtime(format!("Server task failed: {}", e)))?
        .map_err(BinError::from)
}

/// Maps the file configuration onto the API server configuration.
pub fn api_config(config: &FleetConfig) -> BinResult<ApiConfig> {
    let secret = config
        .auth
        .jwt_secret
        .as_ref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BinError::config("auth.jwt_secret is required"))?;

    let jwt = JwtConfig::new(secret.expose())
        .with_issuer(config.auth.issuer.clone())
        .with_expiration(Duration::from_secs(config.auth.token_ttl_secs));

    let cors = &config.cors;
    let mut api = ApiConfig::new()
        .with_host(config.server.host)
        .with_port(config.server.port)
        .with_base_path(config.server.base_path.clone())
        .with_jwt(jwt)
        .with_bcrypt_cost(config.auth.bcrypt_cost);

    api.request_timeout = config.server.request_timeout();
    api.shutdown_timeout = config.server.shutdown_timeout();
    api.body_limit_bytes = config.server.max_body_size;
    api.cors = fleet_api::CorsConfig {
        allowed_origins: cors.allowed_origins.clone(),
        allowed_methods: cors.allowed_methods.clone(),
        allowed_headers: cors.allowed_headers.clone(),
        allow_credentials: cors.allow_credentials,
        preflight_max_age: Duration::from_secs(cors.max_age_secs),
    };

    Ok(api)
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<FleetConfig>,
    port: Option<u16>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: FleetConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the listen port.
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Builds the runtime.
    ///
    /// A missing configuration file is not an error: the runtime then uses
    /// defaults plus environment overrides.
    pub fn build(self) -> BinResult<FleetRuntime> {
        let mut config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => load_or_defaults(&path)?,
            (None, None) => ConfigLoader::new().load_defaults()?,
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }
        config.validate()?;

        Ok(FleetRuntime::new(config))
    }
}

/// Loads the file at `path`, or falls back to defaults if it does not exist.
pub fn load_or_defaults(path: &Path) -> BinResult<FleetConfig> {
    let loader = ConfigLoader::new();
    if path.exists() {
        loader.load(path).map_err(|e| {
            BinError::from(e).with_context(format!("Failed to load config from {}", path.display()))
        })
    } else {
        info!(
            "Config file {} not found, using defaults and environment",
            path.display()
        );
        Ok(loader.load_defaults()?)
    }
}

// =============================================================================
// Tests
// =============================================================================
