// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Runtime settings for the HTTP server.
//!
//! These are built in-process (by the binary from the settings file, or
//! directly by tests); nothing here is read from disk.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use fleet_auth::{JwtConfig, DEFAULT_BCRYPT_COST};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default mount point for every route except `/health`.
pub const DEFAULT_BASE_PATH: &str = "/api/v1";

/// Request bodies above this many bytes are rejected.
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024;

/// Settings the server, router and middleware stack are built from.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind.
    pub host: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Prefix for the API routes.
    pub base_path: String,
    /// Browser cross-origin policy.
    pub cors: CorsConfig,
    /// Token signing and lifetime.
    pub jwt: JwtConfig,
    /// bcrypt work factor applied at signup.
    pub bcrypt_cost: u32,
    /// A request still running after this long gets `408`.
    pub request_timeout: Duration,
    /// Time allowed for in-flight requests once shutdown starts.
    pub shutdown_timeout: Duration,
    /// Upper bound on request body size.
    pub body_limit_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
            cors: CorsConfig::default(),
            jwt: JwtConfig::default(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ApiConfig {
    /// Same as [`ApiConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Sets the bind interface.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Sets the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets token signing and lifetime.
    pub fn with_jwt(mut self, jwt: JwtConfig) -> Self {
        self.jwt = jwt;
        self
    }

    /// Sets the signup bcrypt cost.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Sets the API route prefix.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// `base_path` with any trailing `/` removed, ready to prefix routes.
    pub fn normalized_base_path(&self) -> &str {
        self.base_path.trim_end_matches('/')
    }
}

/// Origins, methods and headers the browser front end may use.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Exact origins, or a single `*` to accept any origin.
    pub allowed_origins: Vec<String>,
    /// HTTP methods; unparseable entries are skipped.
    pub allowed_methods: Vec<String>,
    /// Request headers; unparseable entries are skipped.
    pub allowed_headers: Vec<String>,
    /// Send `Access-Control-Allow-Credentials`. Ignored with `*`.
    pub allow_credentials: bool,
    /// How long a browser may cache a preflight answer.
    pub preflight_max_age: Duration,
}

const DEV_ORIGIN: &str = "http://localhost:5173";
const METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "OPTIONS"];
const HEADERS: [&str; 2] = ["Content-Type", "Authorization"];

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEV_ORIGIN.to_string()],
            allowed_methods: METHODS.iter().map(ToString::to_string).collect(),
            allowed_headers: HEADERS.iter().map(ToString::to_string).collect(),
            allow_credentials: true,
            preflight_max_age: Duration::from_secs(3600),
        }
    }
}

impl CorsConfig {
    /// Accepts every origin, without credentials.
    pub fn any_origin() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: false,
            ..Self::default()
        }
    }

    /// Whether the origin list contains the `*` wildcard.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}
