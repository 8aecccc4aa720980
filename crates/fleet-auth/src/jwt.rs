// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT token management.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::Claims;
use crate::error::{AuthError, AuthResult, TokenError};

/// Session token lifetime: eight hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 8 * 60 * 60;

// =============================================================================
// JwtConfig
// =============================================================================

/// JWT configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token issuer.
    pub issuer: String,
    /// Token expiration time in seconds.
    pub expiration_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by user
            issuer: "fleet".to_string(),
            expiration_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("expiration_secs", &self.expiration_secs)
            .finish()
    }
}

impl JwtConfig {
    /// Creates a new configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the expiration time.
    pub fn with_expiration(mut self, duration: Duration) -> Self {
        self.expiration_secs = duration.as_secs() as i64;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        if self.secret.is_empty() {
            return Err(AuthError::config("JWT secret is not configured"));
        }
        if self.secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }
        if self.expiration_secs <= 0 {
            return Err(AuthError::config("Token expiration must be positive"));
        }
        Ok(())
    }
}

// =============================================================================
// JwtManager
// =============================================================================

/// Issues and verifies session tokens.
///
/// Tokens are stateless: validity depends only on the signature, the issuer
/// and the expiry. A token stays valid for its whole lifetime even if the
/// officer's role changes in the meantime.
#[derive(Clone)]
pub struct JwtManager {
    config: Arc<JwtConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl JwtManager {
    /// Creates a new JWT manager with the given configuration.
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = 0;

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Signs the given claims.
    ///
    /// The configured issuer is stamped onto the token if the claims carry none.
    pub fn issue(&self, claims: &Claims) -> AuthResult<String> {
        let header = Header::new(Algorithm::HS256);

        let stamped;
        let claims = if claims.iss.is_none() {
            stamped = claims.clone().with_issuer(&self.config.issuer);
            &stamped
        } else {
            claims
        };

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenEncoding(e.to_string()))
    }

    /// Issues a token for an officer with the configured lifetime.
    pub fn issue_for(&self, user_id: &str, role: &str) -> AuthResult<String> {
        let claims = Claims::new(user_id, role, self.config.expiration_secs)
            .with_issuer(&self.config.issuer);

        self.issue(&claims)
    }

    /// Verifies a token and returns its claims.
    ///
    /// An empty token is [`TokenError::Missing`]. A bad signature, foreign
    /// issuer, malformed payload or reached expiry is
    /// [`TokenError::ExpiredOrInvalid`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token validation failed");
                TokenError::ExpiredOrInvalid
            })?;

        // The library accepts exp == now; a token is dead at its expiry instant.
        if claims.is_expired() {
            return Err(TokenError::ExpiredOrInvalid);
        }

        Ok(claims)
    }

    /// Verifies the value of an `Authorization` header.
    ///
    /// The header must read `Bearer <token>`; anything else counts as no
    /// credential at all.
    pub fn verify_bearer(&self, header: Option<&str>) -> Result<Claims, TokenError> {
        let token = header
            .and_then(extract_bearer)
            .ok_or(TokenError::Missing)?;

        self.verify(token)
    }

    /// Returns the token expiration time in seconds.
    pub fn expiration_secs(&self) -> i64 {
        self.config.expiration_secs
    }

    /// Returns the issuer stamped on tokens.
    pub fn issuer(&self) -> &str {
        &self.config.issuer
    }
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &self.config.issuer)
            .field("expiration_secs", &self.config.expiration_secs)
            .finish()
    }
}

/// Reads the payload of a token without checking its signature.
///
/// Clients hold no signing secret, so this is how they learn the role baked
/// into a token they were handed. Expired tokens are still rejected. Never use
/// this for server-side authorization.
pub(crate) fn decode_unverified(token: &str) -> Result<Claims, TokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Missing);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation.validate_exp = false;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| TokenError::ExpiredOrInvalid)?;

    if claims.is_expired() {
        return Err(TokenError::ExpiredOrInvalid);
    }

    Ok(claims)
}

fn extract_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if scheme != "Bearer" {
        return None;
    }

    let token = token.trim();
    if token.is_empty() || token.contains(' ') {
        None
    } else {
        Some(token)
    }
}

// =============================================================================
// Tests
// =============================================================================
