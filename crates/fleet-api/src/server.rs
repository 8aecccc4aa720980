// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Extension, Router,
};
use fleet_auth::{JwtManager, Permission, Role};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthLayer, RbacLayer};
use crate::state::AppState;
use crate::store::{OfficerStore, RecordStore, Resource};

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// This is the main entry point for creating and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config().clone();
        Self { state, config }
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let base = self.config.normalized_base_path().to_string();

        let auth = AuthLayer::new(self.state.jwt().clone())
            .with_default_public_paths(&base);

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                axum::http::StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(create_cors_layer(&self.config))
            .layer(DefaultBodyLimit::max(self.config.body_limit_bytes))
            .layer(auth);

        let mut api = Router::new()
            // Auth endpoints
            .route("/auth/signup", post(handlers::signup))
            .route("/auth/login", post(handlers::login))
            .route("/auth/me", get(handlers::current_user))
            .route("/auth/roles", get(handlers::roles))
            // Analytics
            .route(
                "/analytics/summary",
                get(handlers::summary.layer(RbacLayer::require(Permission::ViewAnalytics))),
            )
            .route(
                "/analytics/roi",
                get(handlers::roi.layer(RbacLayer::roles([
                    Role::FleetManager,
                    Role::FinancialAnalyst,
                ]))),
            );

        for resource in Resource::all() {
            api = api.merge(resource_routes(*resource));
        }

        Router::new()
            // Health endpoint (public)
            .route("/health", get(handlers::health))
            .nest(&base, api)
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

/// Builds the CRUD routes of one resource, each method behind its own gate.
fn resource_routes(resource: Resource) -> Router<AppState> {
    let collection = format!("/{}", resource.path());
    let item = format!("/{}/{{id}}", resource.path());

    let view = RbacLayer::require(resource.view_permission());
    let create = RbacLayer::require(resource.create_permission());
    let edit = RbacLayer::require(resource.edit_permission());
    let delete = RbacLayer::require(resource.delete_permission());

    Router::new()
        .route(
            &collection,
            get(handlers::list_records.layer(view.clone()))
                .post(handlers::create_record.layer(create)),
        )
        .route(
            &item,
            get(handlers::get_record.layer(view))
                .put(handlers::update_record.layer(edit))
                .delete(handlers::delete_record.layer(delete)),
        )
        .layer(Extension(resource))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
///
/// A wildcard origin cannot be combined with credentials, so `*` switches
/// credentials off.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;

    let mut layer = CorsLayer::new().max_age(cors.preflight_max_age);

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    let headers: Vec<header::HeaderName> = cors
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();
    layer = layer.allow_headers(headers);

    if cors.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    layer = layer.allow_origin(AllowOrigin::list(origins));

    if cors.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self {
            state_builder: AppState::builder(),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the JWT manager.
    pub fn jwt_manager(mut self, manager: Arc<JwtManager>) -> Self {
        self.state_builder = self.state_builder.jwt_manager(manager);
        self
    }

    /// Sets the officer store.
    pub fn officers(mut self, store: Arc<dyn OfficerStore>) -> Self {
        self.state_builder = self.state_builder.officers(store);
        self
    }

    /// Sets the record store.
    pub fn records(mut self, store: Arc<RecordStore>) -> Self {
        self.state_builder = self.state_builder.records(store);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
