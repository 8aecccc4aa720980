// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use fleet_auth::AuthContext;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Reads the [`AuthContext`] the auth middleware attached. Handlers receive a
/// copy; the context stored on the request cannot be altered from here.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(ctx): Auth) -> impl IntoResponse {
///     format!("Hello, {}", ctx.user_id)
/// }
/// ```
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Auth)
            .ok_or(ApiError::AuthMissing)
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// JSON body extractor whose rejections use the API error format.
///
/// A missing content type, malformed JSON or a shape mismatch is a
/// `VALIDATION_ERROR` instead of axum's plain-text rejection.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ValidatedJson(value))
    }
}

// =============================================================================
// Client IP Extractor
// =============================================================================

/// Extractor for the client IP address.
pub struct ClientIp(pub Option<std::net::IpAddr>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_ip_from_parts(parts)))
    }
}

/// Resolves the client address from proxy headers or the connection.
pub(crate) fn client_ip_from_parts(parts: &Parts) -> Option<std::net::IpAddr> {
    let forwarded = parts
        .headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse().ok());

    if forwarded.is_some() {
        return forwarded;
    }

    let real_ip = parts
        .headers
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok());

    if real_ip.is_some() {
        return real_ip;
    }

    parts
        .extensions
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;
    use fleet_auth::Claims;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_auth_extractor_requires_context() {
        let mut p = parts(HttpRequest::builder().uri("/"));
        let result = Auth::from_request_parts(&mut p, &()).await;
        assert!(matches!(result, Err(ApiError::AuthMissing)));

        p.extensions
            .insert(AuthContext::from_claims(&Claims::new("o-1", "dispatcher", 60)));
        let Auth(ctx) = Auth::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(ctx.user_id, "o-1");
    }

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let p = parts(
            HttpRequest::builder()
                .header("X-Forwarded-For", "10.0.0.1, 10.0.0.2")
                .header("X-Real-IP", "10.0.0.9"),
        );
        assert_eq!(client_ip_from_parts(&p), "10.0.0.1".parse().ok());
    }

    #[test]
    fn test_client_ip_falls_back() {
        let p = parts(HttpRequest::builder().header("X-Real-IP", "10.0.0.9"));
        assert_eq!(client_ip_from_parts(&p), "10.0.0.9".parse().ok());

        let p = parts(HttpRequest::builder());
        assert_eq!(client_ip_from_parts(&p), None);
    }

    #[tokio::test]
    async fn test_validated_json_rejects_malformed_body() {
        let req = HttpRequest::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();

        let result = ValidatedJson::<serde_json::Value>::from_request(req, &()).await;
        assert!(matches!(result, Err(ApiError::Validation { .. })));
    }
}
