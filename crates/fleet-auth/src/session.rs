// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client-side session context.
//!
//! A [`SessionContext`] holds the signed-in officer for a client application
//! and answers the same permission questions the server enforces, so the
//! client can hide what the server would refuse anyway. It is constructed
//! explicitly and passed to whatever needs it; clones share one state.
//!
//! ```text
//! initialize(store) ──► unauthenticated ──establish──► authenticated
//!                              ▲                             │
//!                              └── logout / 401 / bad token ──┘
//! ```
//!
//! A `403 FORBIDDEN` means the token is fine but the role is not enough; the
//! session survives it.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::jwt::decode_unverified;
use crate::{navigation_items_for, rbac, NavItem, Permission, Role};

// =============================================================================
// Session data
// =============================================================================

/// The officer as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Officer ID.
    pub id: String,
    /// Display name.
    pub full_name: String,
    /// Role name.
    pub role: String,
}

/// What a [`TokenStore`] persists between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// The signed session token.
    pub token: String,
    /// The officer the token was issued to.
    pub user: SessionUser,
}

/// Where [`SessionContext::establish`] left the new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Written to the token store; survives a restart.
    Stored,
    /// The store refused the write. The session is active for this process
    /// only and the store still holds whatever it held before.
    MemoryOnly,
}

/// API error codes that mean the credential itself was refused.
const CREDENTIAL_REJECTED: [&str; 2] = ["AUTH_MISSING", "AUTH_INVALID"];

/// Signals raised by the session context for the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The API refused the session; the user must sign in again.
    ReauthenticationRequired,
}

#[derive(Debug, Clone)]
struct Session {
    user: SessionUser,
    // Raw role from the token; permission checks fail closed on unknown roles.
    raw_role: String,
    token: String,
}

// =============================================================================
// TokenStore
// =============================================================================

/// Persistence for the session token.
pub trait TokenStore: Send + Sync {
    /// Returns the stored session, if any.
    ///
    /// `Ok(None)` means nothing is stored. Unreadable or corrupt content is an
    /// error so the caller can clear it.
    fn load(&self) -> io::Result<Option<StoredSession>>;

    /// Persists the session, replacing whatever was stored.
    fn save(&self, session: &StoredSession) -> io::Result<()>;

    /// Removes the stored session.
    fn clear(&self) -> io::Result<()>;
}

/// Keeps the session in process memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a session.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<StoredSession>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, session: &StoredSession) -> io::Result<()> {
        *self.slot.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// Keeps the session in a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<StoredSession>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn save(&self, session: &StoredSession) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec_pretty(session).map_err(io::Error::other)?;

        // Write then rename so a crash never leaves half a file behind.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// SessionContext
// =============================================================================

/// The client's view of who is signed in.
#[derive(Clone)]
pub struct SessionContext {
    state: Arc<RwLock<Option<Session>>>,
    store: Arc<dyn TokenStore>,
}

impl SessionContext {
    /// Restores the session from `store`.
    ///
    /// Unreadable store content, or a stored token that cannot be decoded or
    /// has expired, is cleared from the store and the context starts
    /// unauthenticated.
    pub fn initialize(store: Arc<dyn TokenStore>) -> Self {
        let restored = match store.load() {
            Ok(Some(stored)) => match Self::build(stored.token, stored.user) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::info!(reason = %e, "Discarding stored session");
                    Self::clear_store(store.as_ref());
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable session store, signing out");
                Self::clear_store(store.as_ref());
                None
            }
        };

        Self {
            state: Arc::new(RwLock::new(restored)),
            store,
        }
    }

    /// Creates an unauthenticated context that keeps the session in memory.
    pub fn in_memory() -> Self {
        Self::initialize(Arc::new(MemoryTokenStore::new()))
    }

    /// Signs in with a token and user returned by the login endpoint.
    ///
    /// The whole state is replaced at once; nothing from a previous session
    /// survives. On error the current state is left untouched.
    ///
    /// A store that refuses the write does not block sign-in: the session is
    /// kept in memory and [`Persistence::MemoryOnly`] is returned so the host
    /// can tell the user it will not survive a restart.
    pub fn establish(
        &self,
        token: impl Into<String>,
        user: SessionUser,
    ) -> Result<Persistence, TokenError> {
        let session = Self::build(token.into(), user)?;

        let stored = StoredSession {
            token: session.token.clone(),
            user: session.user.clone(),
        };
        let persistence = match self.store.save(&stored) {
            Ok(()) => Persistence::Stored,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist session, keeping it in memory");
                Persistence::MemoryOnly
            }
        };

        *self.state.write() = Some(session);
        Ok(persistence)
    }

    /// Signs out and forgets the stored session.
    pub fn logout(&self) {
        *self.state.write() = None;
        Self::clear_store(self.store.as_ref());
    }

    /// Reacts to a failed API call, given its status and the `error.code`
    /// from the response body.
    ///
    /// A 401, or a 403 whose code says the token was missing or invalid, ends
    /// the session. A 403 `FORBIDDEN` only denies that one action, so it and
    /// every other status leave the session alone.
    pub fn handle_rejection(&self, status: u16, code: Option<&str>) -> Option<SessionEvent> {
        let credential_refused = match status {
            401 => true,
            403 => code.is_some_and(|c| CREDENTIAL_REJECTED.contains(&c)),
            _ => false,
        };
        if !credential_refused {
            return None;
        }

        tracing::info!(status, code, "API refused the session token, signing out");
        self.logout();
        Some(SessionEvent::ReauthenticationRequired)
    }

    /// Returns the signed-in officer.
    pub fn user(&self) -> Option<SessionUser> {
        self.state.read().as_ref().map(|s| s.user.clone())
    }

    /// Returns the role carried by the token, if it is a catalog role.
    pub fn role(&self) -> Option<Role> {
        self.state
            .read()
            .as_ref()
            .and_then(|s| Role::parse(&s.raw_role))
    }

    /// Returns the session token.
    pub fn token(&self) -> Option<String> {
        self.state.read().as_ref().map(|s| s.token.clone())
    }

    /// Returns the `Authorization` header value for API calls.
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }

    /// Returns `true` while someone is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_some()
    }

    /// Returns `true` if the signed-in officer is an administrator.
    pub fn is_admin(&self) -> bool {
        self.with_role(rbac::is_admin)
    }

    /// Returns `true` if the signed-in officer holds the permission.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.with_role(|role| rbac::has_permission(role, permission))
    }

    /// Returns `true` if the signed-in officer holds any of the permissions.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        self.with_role(|role| rbac::has_any_permission(role, permissions))
    }

    /// Returns `true` if the signed-in officer holds all of the permissions.
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        self.with_role(|role| rbac::has_all_permissions(role, permissions))
    }

    /// Returns the navigation entries the signed-in officer may see.
    pub fn navigation(&self) -> Vec<&'static NavItem> {
        self.with_role(navigation_items_for)
    }

    fn with_role<T>(&self, f: impl FnOnce(Option<&str>) -> T) -> T {
        let guard = self.state.read();
        f(guard.as_ref().map(|s| s.raw_role.as_str()))
    }

    fn clear_store(store: &dyn TokenStore) {
        if let Err(e) = store.clear() {
            tracing::warn!(error = %e, "Failed to clear session store");
        }
    }

    fn build(token: String, user: SessionUser) -> Result<Session, TokenError> {
        let claims = decode_unverified(&token)?;

        Ok(Session {
            user,
            raw_role: claims.role,
            token,
        })
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("SessionContext")
            .field("authenticated", &state.is_some())
            .field("user", &state.as_ref().map(|s| &s.user.id))
            .field("role", &state.as_ref().map(|s| &s.raw_role))
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Claims, JwtConfig, JwtManager};

    fn manager() -> JwtManager {
        JwtManager::new(JwtConfig::new("session-test-secret-long-enough-for-hs256")).unwrap()
    }

    fn user(role: &str) -> SessionUser {
        SessionUser {
            id: "officer-1".to_string(),
            full_name: "Ada Officer".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_starts_unauthenticated() {
        let session = SessionContext::in_memory();

        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.role().is_none());
        assert!(!session.has_permission(Permission::ViewDashboard));
        assert!(!session.has_all_permissions(&[]));
        assert!(session.navigation().is_empty());
    }

    #[test]
    fn test_establish_uses_role_from_token() {
        let session = SessionContext::in_memory();
        let token = manager().issue_for("officer-1", "dispatcher").unwrap();

        // The user payload claims more than the token does; the token wins.
        session.establish(token.clone(), user("fleet_manager")).unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Dispatcher));
        assert!(session.has_permission(Permission::CreateTrip));
        assert!(!session.has_permission(Permission::CreateVehicle));
        assert!(!session.is_admin());
        assert_eq!(session.token(), Some(token.clone()));
        assert_eq!(session.authorization_header(), Some(format!("Bearer {}", token)));
    }

    #[test]
    fn test_establish_replaces_whole_state() {
        let session = SessionContext::in_memory();
        let jwt = manager();

        session
            .establish(jwt.issue_for("a", "fleet_manager").unwrap(), user("fleet_manager"))
            .unwrap();
        assert!(session.is_admin());

        let mut analyst = user("financial_analyst");
        analyst.id = "b".to_string();
        session
            .establish(jwt.issue_for("b", "financial_analyst").unwrap(), analyst)
            .unwrap();

        assert!(!session.is_admin());
        assert_eq!(session.user().unwrap().id, "b");
        assert!(session.has_permission(Permission::CalculateRoi));
        assert!(!session.has_permission(Permission::DeleteVehicle));
    }

    #[test]
    fn test_establish_rejects_bad_token() {
        let session = SessionContext::in_memory();

        assert_eq!(
            session.establish("garbage", user("dispatcher")),
            Err(TokenError::ExpiredOrInvalid)
        );
        assert_eq!(session.establish("", user("dispatcher")), Err(TokenError::Missing));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        let session = SessionContext::in_memory();
        session
            .establish(manager().issue_for("x", "auditor").unwrap(), user("auditor"))
            .unwrap();

        assert!(session.is_authenticated());
        assert!(session.role().is_none());
        assert!(!session.has_any_permission(Permission::all()));
        assert!(session.has_all_permissions(&[]));
        assert!(session.navigation().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let session = SessionContext::in_memory();
        let other = session.clone();

        session
            .establish(manager().issue_for("x", "safety_officer").unwrap(), user("safety_officer"))
            .unwrap();
        assert!(other.has_permission(Permission::ManageSafetyScores));

        other.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_handle_rejection() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = SessionContext::initialize(store.clone());
        let token = manager().issue_for("x", "dispatcher").unwrap();

        session.establish(token.clone(), user("dispatcher")).unwrap();
        assert_eq!(session.handle_rejection(404, Some("NOT_FOUND")), None);
        assert_eq!(session.handle_rejection(500, Some("INTERNAL_ERROR")), None);
        assert!(session.is_authenticated());

        assert_eq!(
            session.handle_rejection(403, Some("AUTH_INVALID")),
            Some(SessionEvent::ReauthenticationRequired)
        );
        assert!(!session.is_authenticated());
        assert!(store.load().unwrap().is_none());

        session.establish(token, user("dispatcher")).unwrap();
        assert_eq!(
            session.handle_rejection(401, None),
            Some(SessionEvent::ReauthenticationRequired)
        );
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_permission_denial_keeps_session() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = SessionContext::initialize(store.clone());
        session
            .establish(manager().issue_for("x", "dispatcher").unwrap(), user("dispatcher"))
            .unwrap();

        assert_eq!(session.handle_rejection(403, Some("FORBIDDEN")), None);
        assert_eq!(session.handle_rejection(403, None), None);
        assert!(session.is_authenticated());
        assert!(store.load().unwrap().is_some());

        assert_eq!(
            session.handle_rejection(403, Some("AUTH_MISSING")),
            Some(SessionEvent::ReauthenticationRequired)
        );
        assert!(!session.is_authenticated());
    }

    struct ReadOnlyStore;

    impl TokenStore for ReadOnlyStore {
        fn load(&self) -> io::Result<Option<StoredSession>> {
            Ok(None)
        }

        fn save(&self, _session: &StoredSession) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn clear(&self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_establish_reports_persistence() {
        let token = manager().issue_for("x", "dispatcher").unwrap();

        let stored = SessionContext::in_memory();
        assert_eq!(
            stored.establish(token.clone(), user("dispatcher")),
            Ok(Persistence::Stored)
        );

        let volatile = SessionContext::initialize(Arc::new(ReadOnlyStore));
        assert_eq!(
            volatile.establish(token, user("dispatcher")),
            Ok(Persistence::MemoryOnly)
        );
        assert!(volatile.is_authenticated());
    }

    #[test]
    fn test_initialize_restores_valid_session() {
        let token = manager().issue_for("officer-1", "financial_analyst").unwrap();
        let store = Arc::new(MemoryTokenStore::with_session(StoredSession {
            token,
            user: user("financial_analyst"),
        }));

        let session = SessionContext::initialize(store);
        assert_eq!(session.role(), Some(Role::FinancialAnalyst));
        assert_eq!(session.user().unwrap().full_name, "Ada Officer");
    }

    #[test]
    fn test_initialize_discards_expired_session() {
        let token = manager()
            .issue(&Claims::new("officer-1", "dispatcher", -60))
            .unwrap();
        let store = Arc::new(MemoryTokenStore::with_session(StoredSession {
            token,
            user: user("dispatcher"),
        }));

        let session = SessionContext::initialize(store.clone());
        assert!(!session.is_authenticated());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();

        let stored = StoredSession {
            token: "t".to_string(),
            user: user("dispatcher"),
        };
        store.save(&stored).unwrap();
        assert_eq!(store.load().unwrap(), Some(stored));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("fullName"));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_removed_on_initialize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = FileTokenStore::new(&path);
        let err = store.load().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let session = SessionContext::initialize(Arc::new(store));
        assert!(!session.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_persists_across_contexts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let token = manager().issue_for("officer-1", "fleet_manager").unwrap();

        let first = SessionContext::initialize(Arc::new(FileTokenStore::new(&path)));
        first.establish(token, user("fleet_manager")).unwrap();

        let second = SessionContext::initialize(Arc::new(FileTokenStore::new(&path)));
        assert!(second.is_admin());

        second.logout();
        assert!(!path.exists());
    }
}
