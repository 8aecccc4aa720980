// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Officer accounts.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleet_auth::Role;
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use super::{StoreError, StoreResult};

/// A registered officer, including the password hash.
///
/// Never serialized; use [`Officer::summary`] for anything that leaves the
/// server.
#[derive(Debug, Clone)]
pub struct Officer {
    /// Officer ID.
    pub id: Uuid,
    /// Display name.
    pub full_name: String,
    /// Normalized e-mail.
    pub email: String,
    /// bcrypt digest.
    pub password_hash: String,
    /// Role.
    pub role: Role,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl Officer {
    /// Returns the public view of this officer.
    pub fn summary(&self) -> OfficerSummary {
        OfficerSummary {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// The public view of an officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerSummary {
    /// Officer ID.
    pub id: Uuid,
    /// Display name.
    pub full_name: String,
    /// E-mail.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Input for registering an officer. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewOfficer {
    /// Display name.
    pub full_name: String,
    /// E-mail as entered.
    pub email: String,
    /// bcrypt digest.
    pub password_hash: String,
    /// Role.
    pub role: Role,
}

/// Persistence for officer accounts.
#[async_trait]
pub trait OfficerStore: Send + Sync {
    /// Registers an officer. Fails with [`StoreError::DuplicateEmail`] if the
    /// e-mail is taken.
    async fn create(&self, officer: NewOfficer) -> StoreResult<Officer>;

    /// Looks an officer up by e-mail.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Officer>>;

    /// Looks an officer up by ID.
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Officer>>;
}

/// E-mails are unique regardless of case and surrounding whitespace.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Officer store kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryOfficerStore {
    officers: RwLock<HashMap<Uuid, Officer>>,
}

impl InMemoryOfficerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered officers.
    pub fn len(&self) -> usize {
        self.officers.read().len()
    }

    /// Returns `true` if no officer is registered.
    pub fn is_empty(&self) -> bool {
        self.officers.read().is_empty()
    }
}

#[async_trait]
impl OfficerStore for InMemoryOfficerStore {
    async fn create(&self, officer: NewOfficer) -> StoreResult<Officer> {
        let email = normalize_email(&officer.email);
        let mut officers = self.officers.write();

        if officers.values().any(|o| o.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        let record = Officer {
            id: Uuid::now_v7(),
            full_name: officer.full_name.trim().to_string(),
            email,
            password_hash: officer.password_hash,
            role: officer.role,
            created_at: Utc::now(),
        };
        officers.insert(record.id, record.clone());

        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Officer>> {
        let email = normalize_email(email);
        Ok(self
            .officers
            .read()
            .values()
            .find(|o| o.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Officer>> {
        Ok(self.officers.read().get(&id).cloned())
    }
}
