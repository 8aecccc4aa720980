// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: liveness check
//! - [`auth`]: signup, login, current officer, role catalog
//! - [`records`]: CRUD shared by every fleet resource
//! - [`analytics`]: fleet summary and return on investment

mod analytics;
mod auth;
mod health;
mod records;

pub use analytics::*;
pub use auth::*;
pub use health::*;
pub use records::*;
