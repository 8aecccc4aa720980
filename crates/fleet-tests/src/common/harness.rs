// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! Runs the full API router in process. Requests go through every layer the
//! real server uses, without binding a socket.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use fleet_api::{ApiConfig, ApiServer, ApiServerBuilder};
use fleet_auth::{Role, SessionUser};
use serde_json::Value;
use tower::ServiceExt;

use super::fixtures::{ConfigFixtures, OfficerFixture};

// =============================================================================
// TestResponse
// =============================================================================

/// A response with its body already read.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Parsed JSON body; `Null` when the body is empty.
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error.code` member of an error envelope.
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"]["code"].as_str()
    }
}

// =============================================================================
// TestApp
// =============================================================================

/// An in-process API server.
pub struct TestApp {
    server: ApiServer,
    router: Router,
    base_path: String,
}

impl TestApp {
    /// Creates an app with the fixture configuration.
    pub fn new() -> Self {
        Self::with_config(ConfigFixtures::api())
    }

    /// Creates an app with a custom configuration.
    pub fn with_config(config: ApiConfig) -> Self {
        super::init_test_logging();

        let base_path = config.normalized_base_path().to_string();
        let server = ApiServerBuilder::new()
            .config(config)
            .build()
            .expect("Failed to build API server");
        let router = server.router();

        Self {
            server,
            router,
            base_path,
        }
    }

    /// The server under test.
    pub fn server(&self) -> &ApiServer {
        &self.server
    }

    /// Prefixes a route with the base path.
    pub fn path(&self, route: &str) -> String {
        format!("{}{}", self.base_path, route)
    }

    /// Sends a request to a route under the base path.
    pub async fn request(
        &self,
        method: Method,
        route: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(self.path(route));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a prepared request as is.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    /// GET a route.
    pub async fn get(&self, route: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, route, token, None).await
    }

    /// POST a JSON body to a route.
    pub async fn post(&self, route: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, route, token, Some(body)).await
    }

    /// PUT a JSON body to a route.
    pub async fn put(&self, route: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, route, token, Some(body)).await
    }

    /// DELETE a route.
    pub async fn delete(&self, route: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, route, token, None).await
    }

    /// Signs an officer up.
    pub async fn signup(&self, officer: &OfficerFixture) -> TestResponse {
        self.post("/auth/signup", None, officer.signup_body()).await
    }

    /// Logs an officer in.
    pub async fn login(&self, officer: &OfficerFixture) -> TestResponse {
        self.post("/auth/login", None, officer.login_body()).await
    }

    /// Signs up and logs in the fixture officer of a role, returning the
    /// token and user from the login response.
    pub async fn session_for(&self, role: Role) -> (String, SessionUser) {
        let officer = OfficerFixture::for_role(role);

        let signup = self.signup(&officer).await;
        assert_eq!(signup.status, StatusCode::CREATED, "signup failed: {}", signup.body);

        let login = self.login(&officer).await;
        assert_eq!(login.status, StatusCode::OK, "login failed: {}", login.body);

        let token = login.data()["token"]
            .as_str()
            .expect("login response carries a token")
            .to_string();
        let user: SessionUser = serde_json::from_value(login.data()["user"].clone())
            .expect("login response carries a user");

        (token, user)
    }

    /// Signs up and logs in the fixture officer of a role.
    pub async fn token_for(&self, role: Role) -> String {
        self.session_for(role).await.0
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
