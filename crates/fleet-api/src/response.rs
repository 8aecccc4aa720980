// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fleet_auth::{NavItem, SessionUser};
use serde::{Deserialize, Serialize};

use crate::store::OfficerSummary;

// =============================================================================
// ApiResponse
// =============================================================================

/// Success envelope shared by all endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`; failures go through [`crate::ApiError`].
    pub success: bool,
    /// Human-readable summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data.
    pub data: T,
    #[serde(skip)]
    status: Option<u16>,
}

impl<T> ApiResponse<T> {
    /// Creates a 200 response with data.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
            status: None,
        }
    }

    /// Creates a 201 response with data.
    pub fn created(data: T) -> Self {
        Self {
            status: Some(StatusCode::CREATED.as_u16()),
            ..Self::success(data)
        }
    }

    /// Adds a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the HTTP status this response will be sent with.
    pub fn status_code(&self) -> StatusCode {
        self.status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::OK)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

// =============================================================================
// Typed Responses
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Version string.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// Signup response payload.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// The registered officer, without credentials.
    pub officer: OfficerSummary,
}

/// Login response payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed session token.
    pub token: String,
    /// The authenticated officer.
    pub user: SessionUser,
}

/// Who-am-I response payload.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Officer ID.
    pub id: String,
    /// Role as carried by the token.
    pub role: String,
    /// Permission tags held by the role.
    pub permissions: Vec<&'static str>,
    /// Dashboard entries the role may see.
    pub navigation: Vec<&'static NavItem>,
}

// =============================================================================
// Tests
// =============================================================================
