// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Token stores with scripted behavior for session tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use fleet_auth::{MemoryTokenStore, StoredSession, TokenStore};

// =============================================================================
// CountingTokenStore
// =============================================================================

/// An in-memory store that counts calls.
#[derive(Debug, Default)]
pub struct CountingTokenStore {
    inner: MemoryTokenStore,
    loads: AtomicUsize,
    saves: AtomicUsize,
    clears: AtomicUsize,
}

impl CountingTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a session.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: MemoryTokenStore::with_session(session),
            ..Self::default()
        }
    }

    /// Number of `load` calls.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of `save` calls.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of `clear` calls.
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// What the store currently holds.
    pub fn stored(&self) -> Option<StoredSession> {
        self.inner.load().ok().flatten()
    }
}

impl TokenStore for CountingTokenStore {
    fn load(&self) -> io::Result<Option<StoredSession>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load()
    }

    fn save(&self, session: &StoredSession) -> io::Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(session)
    }

    fn clear(&self) -> io::Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

// =============================================================================
// FailingTokenStore
// =============================================================================

/// A store whose writes always fail.
#[derive(Debug, Default)]
pub struct FailingTokenStore;

impl TokenStore for FailingTokenStore {
    fn load(&self) -> io::Result<Option<StoredSession>> {
        Ok(None)
    }

    fn save(&self, _session: &StoredSession) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only store"))
    }

    fn clear(&self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only store"))
    }
}
