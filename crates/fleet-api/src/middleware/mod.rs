// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! - [`AuthMiddleware`]: bearer token authentication
//! - [`RbacMiddleware`]: role and permission gates per route

mod auth;
mod rbac;

pub use auth::{default_public_paths, AuthLayer, AuthMiddleware};
pub use rbac::{RbacLayer, RbacMiddleware, Requirement};
