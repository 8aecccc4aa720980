// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the authentication core.

use thiserror::Error;

/// Result type alias for fallible auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Unexpected faults in the authentication core.
///
/// Expected negative outcomes (wrong password, bad token) are not errors: the
/// credential service returns `false` and the token service returns a
/// [`TokenError`]. Everything here is a fault the caller cannot recover from
/// and should surface as an internal error.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Hashing a password failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Signing a token failed.
    #[error("Token encoding failed: {0}")]
    TokenEncoding(String),

    /// The signing configuration is unusable.
    #[error("Auth configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Why a presented token was not accepted.
///
/// The two cases are kept apart so callers can answer "no credential" and
/// "bad credential" differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// No token was supplied, or the header did not carry a bearer token.
    #[error("Authentication token missing")]
    Missing,

    /// The token is malformed, forged, issued by someone else, or expired.
    #[error("Session expired or invalid token")]
    ExpiredOrInvalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_error_messages() {
        assert_eq!(TokenError::Missing.to_string(), "Authentication token missing");
        assert_eq!(
            TokenError::ExpiredOrInvalid.to_string(),
            "Session expired or invalid token"
        );
    }

    #[test]
    fn test_auth_error_display() {
        let err = AuthError::config("JWT secret is not configured");
        assert_eq!(
            err.to_string(),
            "Auth configuration error: JWT secret is not configured"
        );
    }
}
