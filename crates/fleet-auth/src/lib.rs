// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # fleet-auth
//!
//! Authentication and authorization core for the fleet platform.
//!
//! This crate is the single source of truth for who may do what. It is shared
//! by the HTTP server (which enforces it) and by clients (which use it to
//! decide what to show). It provides:
//!
//! - The role catalog and the static role → permission table
//! - Pure permission query functions and navigation filtering
//! - Password hashing and verification (bcrypt)
//! - Signed session tokens (JWT)
//! - The per-request [`AuthContext`] and the client-side [`SessionContext`]

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod claims;
mod context;
mod error;
mod jwt;
pub mod navigation;
mod password;
pub mod permission;
mod rbac;
pub mod roles;
pub mod session;

pub use claims::Claims;
pub use context::AuthContext;
pub use error::{AuthError, AuthResult, TokenError};
pub use jwt::{JwtConfig, JwtManager, DEFAULT_TOKEN_TTL_SECS};
pub use navigation::{navigation_items_for, NavItem, NAV_ITEMS};
pub use password::{PasswordHasher, DEFAULT_BCRYPT_COST};
pub use permission::{Permission, PermissionSet};
pub use rbac::{
    has_all_permissions, has_any_permission, has_permission, is_admin, role_permissions,
};
pub use roles::{format_role, Role, RoleInfo};
pub use session::{
    FileTokenStore, MemoryTokenStore, Persistence, SessionContext, SessionEvent, SessionUser,
    StoredSession, TokenStore,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
