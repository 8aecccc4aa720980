// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use std::net::IpAddr;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::{role_permissions, Claims, Permission, PermissionSet, Role};

/// Authentication context for a request.
///
/// Attached to requests after the token has been verified. Permissions are
/// resolved once from the role carried by the token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    /// Officer ID.
    pub user_id: String,
    /// Role name as carried by the token.
    pub role: String,
    /// Resolved permissions.
    #[serde(skip)]
    pub permissions: Arc<PermissionSet>,
    /// Client IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
    /// Request ID for tracing.
    pub request_id: Uuid,
}

impl AuthContext {
    /// Creates a context from verified claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.id.clone(),
            role: claims.role.clone(),
            permissions: Arc::new(role_permissions(Some(&claims.role))),
            client_ip: None,
            request_id: Uuid::now_v7(),
        }
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the catalog role, if the token's role is recognised.
    pub fn known_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    /// Returns `true` if the context's role is exactly `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.known_role() == Some(role)
    }

    /// Returns `true` if the context's role is one of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.known_role().is_some_and(|r| roles.contains(&r))
    }

    /// Returns `true` if the context has the given permission.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Returns `true` if the context has all of the given permissions.
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        self.permissions.contains_all(permissions)
    }

    /// Returns `true` if the context has any of the given permissions.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        self.permissions.contains_any(permissions)
    }

    /// Returns `true` if this context has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.known_role().is_some_and(|r| r.is_admin())
    }
}

// =============================================================================
// Tests
// =============================================================================
