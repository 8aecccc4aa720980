// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! RBAC (Role-Based Access Control) middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use fleet_auth::{AuthContext, Permission, Role};
use tower::{Layer, Service};

use crate::error::ApiError;

// =============================================================================
// Requirement
// =============================================================================

/// What a route demands of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// The caller's role is one of these.
    Roles(Vec<Role>),
    /// The caller holds every one of these permissions.
    All(Vec<Permission>),
    /// The caller holds at least one of these permissions.
    Any(Vec<Permission>),
}

impl Requirement {
    /// Returns `true` if the context satisfies the requirement.
    pub fn is_satisfied_by(&self, ctx: &AuthContext) -> bool {
        match self {
            Requirement::Roles(roles) => ctx.has_any_role(roles),
            Requirement::All(permissions) => ctx.has_all_permissions(permissions),
            Requirement::Any(permissions) => ctx.has_any_permission(permissions),
        }
    }
}

// =============================================================================
// RbacLayer
// =============================================================================

/// Layer for role-based access control.
///
/// Sits behind the auth layer and turns away authenticated callers who do not
/// meet the route's [`Requirement`].
#[derive(Clone)]
pub struct RbacLayer {
    requirement: Arc<Requirement>,
}

impl RbacLayer {
    /// Creates a layer for an arbitrary requirement.
    pub fn new(requirement: Requirement) -> Self {
        Self {
            requirement: Arc::new(requirement),
        }
    }

    /// Creates a layer admitting only the given roles.
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::new(Requirement::Roles(roles.into_iter().collect()))
    }

    /// Creates a layer requiring a single permission.
    pub fn require(permission: Permission) -> Self {
        Self::new(Requirement::All(vec![permission]))
    }

    /// Creates a layer requiring all specified permissions.
    pub fn require_all(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self::new(Requirement::All(permissions.into_iter().collect()))
    }

    /// Creates a layer requiring any of the specified permissions.
    pub fn require_any(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self::new(Requirement::Any(permissions.into_iter().collect()))
    }

    /// Returns the requirement enforced by this layer.
    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

impl<S> Layer<S> for RbacLayer {
    type Service = RbacMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RbacMiddleware {
            inner,
            requirement: self.requirement.clone(),
        }
    }
}

// =============================================================================
// RbacMiddleware
// =============================================================================

/// Middleware for RBAC enforcement.
#[derive(Clone)]
pub struct RbacMiddleware<S> {
    inner: S,
    requirement: Arc<Requirement>,
}

impl<S> Service<Request<Body>> for RbacMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let requirement = self.requirement.clone();
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let Some(ctx) = req.extensions().get::<AuthContext>().cloned() else {
                tracing::warn!(path = %req.uri().path(), "No auth context found, denying access");
                return Ok(ApiError::AuthMissing.into_response());
            };

            if requirement.is_satisfied_by(&ctx) {
                return inner.call(req).await;
            }

            tracing::warn!(
                user_id = %ctx.user_id,
                role = %ctx.role,
                required = ?requirement,
                path = %req.uri().path(),
                "Permission denied"
            );
            Ok(ApiError::forbidden(format!("{:?} not met", requirement)).into_response())
        })
    }
}

// =============================================================================
// Permission Requirement Macro
// =============================================================================

/// Macro for creating RBAC layers.
///
/// ```rust,ignore
/// require_permission!(Permission::ViewTrips);
/// require_permission!(all: Permission::ViewTrips, Permission::CreateTrip);
/// require_permission!(any: Permission::ViewFuelLogs, Permission::ViewAnalytics);
/// require_permission!(roles: Role::FleetManager, Role::FinancialAnalyst);
/// ```
#[macro_export]
macro_rules! require_permission {
    (roles: $($role:expr),+ $(,)?) => {
        $crate::middleware::RbacLayer::roles([$($role),+])
    };
    (all: $($perm:expr),+ $(,)?) => {
        $crate::middleware::RbacLayer::require_all([$($perm),+])
    };
    (any: $($perm:expr),+ $(,)?) => {
        $crate::middleware::RbacLayer::require_any([$($perm),+])
    };
    ($perm:expr) => {
        $crate::middleware::RbacLayer::require($perm)
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use fleet_auth::Claims;
    use std::convert::Infallible;
    use tower::ServiceExt;

    fn mock_service() -> impl Service<Request<Body>, Response = Response, Error = Infallible, Future = impl Future<Output = Result<Response, Infallible>> + Send> + Clone + Send {
        tower::service_fn(|_req| async {
            Ok::<_, Infallible>(Response::new(Body::empty()))
        })
    }

    fn request_as(role: Option<&str>) -> Request<Body> {
        let mut req = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();

        if let Some(role) = role {
            req.extensions_mut()
                .insert(AuthContext::from_claims(&Claims::new("o-1", role, 60)));
        }
        req
    }

    async fn status(layer: RbacLayer, role: Option<&str>) -> StatusCode {
        let mut service = layer.layer(mock_service());
        service
            .ready()
            .await
            .unwrap()
            .call(request_as(role))
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_rbac_permission_granted() {
        let layer = RbacLayer::require(Permission::CreateTrip);
        assert_eq!(status(layer, Some("dispatcher")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rbac_permission_denied() {
        let layer = RbacLayer::require(Permission::CreateVehicle);
        assert_eq!(status(layer, Some("dispatcher")).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rbac_require_all() {
        let layer = RbacLayer::require_all([Permission::ViewTrips, Permission::CreateTrip]);
        assert_eq!(status(layer.clone(), Some("dispatcher")).await, StatusCode::OK);
        assert_eq!(
            status(layer, Some("safety_officer")).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_rbac_require_any() {
        let layer = RbacLayer::require_any([Permission::ManageSafetyScores, Permission::CalculateRoi]);
        assert_eq!(status(layer.clone(), Some("safety_officer")).await, StatusCode::OK);
        assert_eq!(status(layer.clone(), Some("financial_analyst")).await, StatusCode::OK);
        assert_eq!(status(layer, Some("dispatcher")).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rbac_roles() {
        let layer = RbacLayer::roles([Role::FleetManager, Role::FinancialAnalyst]);
        assert_eq!(status(layer.clone(), Some("financial_analyst")).await, StatusCode::OK);
        assert_eq!(status(layer.clone(), Some("dispatcher")).await, StatusCode::FORBIDDEN);
        assert_eq!(status(layer, Some("mystery")).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rbac_unknown_role_denied() {
        let layer = RbacLayer::require(Permission::ViewDashboard);
        assert_eq!(status(layer, Some("auditor")).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rbac_no_auth_context() {
        let layer = RbacLayer::require(Permission::ViewDashboard);
        assert_eq!(status(layer, None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_denial_body_is_generic() {
        let service = RbacLayer::require(Permission::DeleteVehicle).layer(mock_service());
        let response = service.oneshot(request_as(Some("dispatcher"))).await.unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert_eq!(body["error"]["message"], "Access denied");
        assert!(!bytes.windows(6).any(|w| w == b"delete"));
    }

    #[test]
    fn test_macro_builds_requirements() {
        assert_eq!(
            require_permission!(Permission::ViewTrips).requirement(),
            &Requirement::All(vec![Permission::ViewTrips])
        );
        assert_eq!(
            require_permission!(any: Permission::ViewTrips, Permission::ViewDrivers).requirement(),
            &Requirement::Any(vec![Permission::ViewTrips, Permission::ViewDrivers])
        );
        assert_eq!(
            require_permission!(roles: Role::FleetManager).requirement(),
            &Requirement::Roles(vec![Role::FleetManager])
        );
    }
}
