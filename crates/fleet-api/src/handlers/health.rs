// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Liveness probe.

use axum::Json;

use crate::response::HealthResponse;

/// GET /health
///
/// Mounted outside the base path and never gated, so load balancers can
/// probe it without a token.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
