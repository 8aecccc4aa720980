// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Record handlers shared by every fleet resource.
//!
//! The resource a route serves is attached as a request extension when the
//! router is built, so one set of handlers covers vehicles, trips, drivers and
//! both kinds of log.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, ValidatedJson};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::store::Resource;

fn parse_id(resource: Resource, id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ApiError::not_found(resource.label()))
}

/// GET {base}/{resource}
pub async fn list_records(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
) -> ApiResult<impl IntoResponse> {
    Ok(ApiResponse::success(state.records().list(resource)))
}

/// GET {base}/{resource}/{id}
pub async fn get_record(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(resource, &id)?;
    Ok(ApiResponse::success(state.records().get(resource, id)?))
}

/// POST {base}/{resource}
pub async fn create_record(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    Auth(auth_ctx): Auth,
    ValidatedJson(body): ValidatedJson<Value>,
) -> ApiResult<impl IntoResponse> {
    let record = state.records().create(resource, body)?;

    tracing::info!(
        resource = %resource,
        record_id = %record.id,
        user_id = %auth_ctx.user_id,
        "Record created"
    );

    Ok(ApiResponse::created(record).with_message(format!("{} created", resource.label())))
}

/// PUT {base}/{resource}/{id}
pub async fn update_record(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    Auth(auth_ctx): Auth,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<Value>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(resource, &id)?;
    let record = state.records().update(resource, id, body)?;

    tracing::info!(
        resource = %resource,
        record_id = %id,
        user_id = %auth_ctx.user_id,
        "Record updated"
    );

    Ok(ApiResponse::success(record).with_message(format!("{} updated", resource.label())))
}

/// DELETE {base}/{resource}/{id}
pub async fn delete_record(
    State(state): State<AppState>,
    Extension(resource): Extension<Resource>,
    Auth(auth_ctx): Auth,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(resource, &id)?;
    state.records().delete(resource, id)?;

    tracing::info!(
        resource = %resource,
        record_id = %id,
        user_id = %auth_ctx.user_id,
        "Record deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
