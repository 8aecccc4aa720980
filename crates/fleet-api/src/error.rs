// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The error taxonomy shared by handlers and middleware.
//!
//! Each [`ApiError`] variant owns one HTTP status and one machine-readable
//! code. Responses always have the shape
//! `{"error": {"code": .., "message": .., "details"?: ..}}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fleet_auth::{AuthError, TokenError};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Everything a request can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete input.
    #[error("Validation error: {message}")]
    Validation {
        /// Summary for the client.
        message: String,
        /// Per-field problems; may be empty.
        fields: ValidationErrors,
    },

    /// No bearer token on a protected route.
    #[error("Authentication token missing")]
    AuthMissing,

    /// Unknown e-mail or wrong password. Both read the same to the client.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Bearer token present but expired, forged or malformed.
    #[error("Session expired or invalid token")]
    AuthInvalid,

    /// Caller's role lacks the required permission.
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// Server-side reason; the client only sees "Access denied".
        reason: String,
    },

    /// No such record, or an id that cannot name one.
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Human label of what was looked up.
        resource: String,
    },

    /// A uniqueness rule was violated.
    #[error("Conflict: {message}")]
    Conflict {
        /// Client-facing explanation.
        message: String,
    },

    /// Unexpected failure. The cause is logged, not returned.
    #[error("Internal error: {message}")]
    Internal {
        /// Cause, for logs only.
        message: String,
    },
}

impl ApiError {
    /// Validation failure without field detail.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::validation_with_errors(message, ValidationErrors::new())
    }

    /// Validation failure listing the offending fields.
    pub fn validation_with_errors(message: impl Into<String>, fields: ValidationErrors) -> Self {
        Self::Validation {
            message: message.into(),
            fields,
        }
    }

    /// Permission denial; `reason` is only logged.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Missing record of kind `resource`.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Uniqueness violation.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Unexpected failure; `message` is only logged.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    fn classify(&self) -> (StatusCode, &'static str) {
        use StatusCode as S;
        match self {
            Self::Validation { .. } => (S::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::AuthMissing => (S::UNAUTHORIZED, "AUTH_MISSING"),
            Self::InvalidCredentials => (S::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            Self::AuthInvalid => (S::FORBIDDEN, "AUTH_INVALID"),
            Self::Forbidden { .. } => (S::FORBIDDEN, "FORBIDDEN"),
            Self::NotFound { .. } => (S::NOT_FOUND, "NOT_FOUND"),
            Self::Conflict { .. } => (S::CONFLICT, "CONFLICT"),
            Self::Internal { .. } => (S::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// HTTP status sent with this error.
    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    /// Stable code clients can branch on.
    pub fn error_code(&self) -> &'static str {
        self.classify().1
    }

    /// Text placed in the response body.
    ///
    /// Denials never name the missing permission and internal failures never
    /// leak their cause.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } | Self::Conflict { message } => message.clone(),
            Self::Forbidden { .. } => "Access denied".to_string(),
            Self::NotFound { resource } => format!("{} not found", resource),
            Self::Internal { .. } => "Internal server error".to_string(),
            Self::AuthMissing | Self::InvalidCredentials | Self::AuthInvalid => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        match &self {
            Self::Internal { message } => {
                tracing::error!(code, %status, cause = %message, "Request failed");
            }
            _ => tracing::debug!(code, %status, error = %self, "Request rejected"),
        }

        let details = match &self {
            Self::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        };
        let body = Envelope {
            error: Payload {
                code,
                message: self.user_message(),
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    error: Payload<'a>,
}

#[derive(Serialize)]
struct Payload<'a> {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a ValidationErrors>,
}

/// Field-level problems collected while checking a request body.
///
/// Serializes as `{"fields": [{"field": .., "message": ..}]}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
}

#[derive(Debug, Clone, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

impl ValidationErrors {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem with `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the offending fields, in the order they were recorded.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field.as_str()).collect()
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => Self::AuthMissing,
            TokenError::ExpiredOrInvalid => Self::AuthInvalid,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => Self::conflict("An officer with this email already exists"),
            StoreError::NotFound { resource, .. } => Self::not_found(resource),
            StoreError::InvalidRecord(message) => Self::validation(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::validation(format!("Invalid request body: {}", err.body_text()))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Background task failed: {}", err))
    }
}
