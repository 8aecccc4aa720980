// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Role;

/// Claims carried by a session token.
///
/// The role travels as the raw string it was issued with. Decoding never
/// fails because of an unrecognised role; such a token simply resolves to no
/// permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Officer ID.
    pub id: String,

    /// Role name.
    pub role: String,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Creates claims for an officer, valid for `expires_in_secs` from now.
    pub fn new(user_id: impl Into<String>, role: impl Into<String>, expires_in_secs: i64) -> Self {
        let now = Utc::now().timestamp();

        Self {
            id: user_id.into(),
            role: role.into(),
            iat: now,
            exp: now + expires_in_secs,
            iss: None,
        }
    }

    /// Returns the officer ID.
    pub fn user_id(&self) -> &str {
        &self.id
    }

    /// Returns the role if it belongs to the catalog.
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    /// Returns `true` once the expiry instant has been reached.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the time remaining until expiration.
    pub fn time_until_expiration(&self) -> Option<std::time::Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(std::time::Duration::from_secs((self.exp - now) as u64))
        } else {
            None
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
