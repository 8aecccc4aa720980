// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT authentication middleware.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use fleet_auth::{AuthContext, JwtManager};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::client_ip_from_parts;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for JWT authentication.
///
/// Requests to public paths pass through without an identity. Every other
/// request must carry `Authorization: Bearer <token>`; a verified token puts an
/// [`AuthContext`] into the request extensions.
#[derive(Clone)]
pub struct AuthLayer {
    jwt_manager: Arc<JwtManager>,
    public_paths: Arc<HashSet<String>>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            jwt_manager,
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Sets the paths that don't require authentication.
    ///
    /// A path ending in `*` matches every path with that prefix.
    pub fn with_public_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.public_paths = Arc::new(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Uses the default public paths under `base_path`.
    pub fn with_default_public_paths(self, base_path: &str) -> Self {
        self.with_public_paths(default_public_paths(base_path))
    }
}

/// Paths reachable without a token.
pub fn default_public_paths(base_path: &str) -> Vec<String> {
    let base = base_path.trim_end_matches('/');
    vec![
        "/health".to_string(),
        format!("{}/auth/signup", base),
        format!("{}/auth/login", base),
        format!("{}/auth/roles", base),
    ]
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt_manager: self.jwt_manager.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for JWT authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt_manager: Arc<JwtManager>,
    public_paths: Arc<HashSet<String>>,
}

impl<S> AuthMiddleware<S> {
    /// Checks if a path is public.
    fn is_public_path(&self, path: &str) -> bool {
        if self.public_paths.contains(path) {
            return true;
        }

        self.public_paths.iter().any(|public_path| {
            public_path
                .strip_suffix('*')
                .is_some_and(|prefix| path.starts_with(prefix))
        })
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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
        let jwt_manager = self.jwt_manager.clone();
        let is_public = self.is_public_path(req.uri().path());

        // Take the service that was driven to readiness, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            if is_public {
                return inner.call(req).await;
            }

            let header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok());

            let claims = match jwt_manager.verify_bearer(header) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::debug!(path = %req.uri().path(), reason = %e, "Authentication failed");
                    return Ok(ApiError::from(e).into_response());
                }
            };

            let (mut parts, body) = req.into_parts();

            let mut auth_ctx = AuthContext::from_claims(&claims).with_request_id(Uuid::now_v7());
            if let Some(ip) = client_ip_from_parts(&parts) {
                auth_ctx = auth_ctx.with_client_ip(ip);
            }

            tracing::trace!(
                user_id = %auth_ctx.user_id,
                role = %auth_ctx.role,
                request_id = %auth_ctx.request_id,
                "Request authenticated"
            );

            parts.extensions.insert(auth_ctx);
            inner.call(Request::from_parts(parts, body)).await
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
