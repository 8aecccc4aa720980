// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory persistence for officers and fleet records.

mod officers;
mod records;

pub use officers::{InMemoryOfficerStore, NewOfficer, Officer, OfficerStore, OfficerSummary};
pub use records::{Record, RecordStore, Resource};

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An officer with the same e-mail is already registered.
    #[error("Email already registered")]
    DuplicateEmail,

    /// No record with this ID.
    #[error("{resource} '{id}' not found")]
    NotFound {
        /// Resource label.
        resource: String,
        /// Requested ID.
        id: String,
    },

    /// The submitted record is not a JSON object.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }
}
