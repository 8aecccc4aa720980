// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # fleet-api
//!
//! REST API server for the fleet platform.
//!
//! This crate provides the HTTP API server: officer signup and login, JWT
//! authentication, per-route RBAC gates over the fleet record endpoints, and
//! the analytics reports.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;
pub mod store;

pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult, ValidationErrors};
pub use middleware::{AuthLayer, RbacLayer, Requirement};
pub use response::ApiResponse;
pub use server::{ApiServer, ApiServerBuilder};
pub use state::{AppState, AppStateBuilder};
pub use store::{
    InMemoryOfficerStore, Officer, OfficerStore, Record, RecordStore, Resource, StoreError,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
