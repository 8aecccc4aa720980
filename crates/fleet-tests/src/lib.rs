// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Fleet Integration Tests
//!
//! Integration tests for the fleet platform, plus the helpers they share.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Officers, secrets and records used across suites
//!   - `harness`: An in-process API server driven with `oneshot` requests
//!   - `assertions`: Helpers for checking response envelopes
//!   - `mocks`: Token stores with scripted behavior
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p fleet-tests
//!
//! # Run specific test suite
//! cargo test -p fleet-tests --test integration_auth
//! cargo test -p fleet-tests --test integration_api
//! cargo test -p fleet-tests --test integration_session
//! cargo test -p fleet-tests --test integration_config
//! ```
//!
//! ## Test Categories
//!
//! ### Auth Tests (`integration_auth.rs`)
//! - The role → permission table, checked exhaustively
//! - Permission queries for missing and unknown roles
//! - Password hashing and token round trips
//!
//! ### API Tests (`integration_api.rs`)
//! - Signup and login flows
//! - 401 versus 403 for missing, invalid and insufficient credentials
//! - Per-method gates on every resource
//! - Analytics gates and figures
//!
//! ### Session Tests (`integration_session.rs`)
//! - Establish, restore and logout against file and memory stores
//! - Reaction to rejected requests
//!
//! ### Config Tests (`integration_config.rs`)
//! - YAML, TOML and JSON loading
//! - Environment overrides and validation
//!
//! ## Using the Harness
//!
//! ```rust,ignore
//! use fleet_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new();
//!     let token = app.token_for(Role::Dispatcher).await;
//!     let response = app.get("/vehicles", Some(&token)).await;
//!     response.assert_status(200);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use fleet_auth::{Permission, Role};
}
