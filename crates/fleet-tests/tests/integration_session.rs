// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Session Integration Tests
//!
//! Tests for the client-side [`SessionContext`] against a live router:
//!
//! - Establishing a session from a real login
//! - Restoring it from file and memory stores
//! - Atomic replacement on re-login
//! - Teardown on logout and on rejected tokens, but not on permission denials

use std::sync::Arc;

use fleet_auth::{
    Claims, FileTokenStore, JwtManager, Persistence, SessionContext, SessionEvent, SessionUser,
    StoredSession, TokenStore,
};
use fleet_tests::common::temp_test_dir;
use fleet_tests::prelude::*;

fn user(id: &str, role: Role) -> SessionUser {
    SessionUser {
        id: id.to_string(),
        full_name: "Session Officer".to_string(),
        role: role.as_str().to_string(),
    }
}

fn jwt() -> JwtManager {
    JwtManager::new(ConfigFixtures::jwt()).unwrap()
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_session_from_login_drives_api_calls() {
    let app = TestApp::new();
    let (token, login_user) = app.session_for(Role::Dispatcher).await;

    let session = SessionContext::in_memory();
    assert!(!session.is_authenticated());
    session.establish(token, login_user.clone()).unwrap();

    assert_eq!(session.user(), Some(login_user));
    assert_eq!(session.role(), Some(Role::Dispatcher));
    assert!(session.has_permission(Permission::CreateTrip));
    assert!(!session.has_permission(Permission::CreateVehicle));

    // What the client shows matches what the server enforces.
    let header = session.authorization_header().unwrap();
    let token = header.strip_prefix("Bearer ").unwrap();
    app.get("/trips", Some(token)).await.assert_success(200);
    app.post("/vehicles", Some(token), RecordFixtures::vehicle("Van", 1.0))
        .await
        .assert_error(403, "FORBIDDEN");
}

#[tokio::test]
async fn test_session_survives_permission_denial() {
    let app = TestApp::new();
    let (token, login_user) = app.session_for(Role::Dispatcher).await;

    let store = Arc::new(CountingTokenStore::new());
    let session = SessionContext::initialize(store.clone());
    session.establish(token.clone(), login_user).unwrap();

    let response = app
        .post("/vehicles", Some(&token), RecordFixtures::vehicle("Van", 1.0))
        .await;
    response.assert_error(403, "FORBIDDEN");

    assert_eq!(
        session.handle_rejection(response.status.as_u16(), response.error_code()),
        None
    );
    assert!(session.is_authenticated());
    assert_eq!(store.clears(), 0);
    assert_eq!(store.stored().unwrap().token, token);

    // The same token still works for what the role allows.
    app.get("/trips", Some(&token)).await.assert_success(200);
}

#[test]
fn test_session_restores_from_file() {
    let dir = temp_test_dir("fleet-session");
    let path = dir.path().join("nested").join("session.json");
    let token = jwt().issue_for("o-7", "financial_analyst").unwrap();

    {
        let session = SessionContext::initialize(Arc::new(FileTokenStore::new(&path)));
        session
            .establish(token.clone(), user("o-7", Role::FinancialAnalyst))
            .unwrap();
    }
    assert!(path.exists());

    let restored = SessionContext::initialize(Arc::new(FileTokenStore::new(&path)));
    assert!(restored.is_authenticated());
    assert_eq!(restored.token(), Some(token));
    assert!(restored.has_permission(Permission::CalculateRoi));
    assert!(!restored.is_admin());

    restored.logout();
    assert!(!restored.is_authenticated());
    assert!(!path.exists());

    let after_logout = SessionContext::initialize(Arc::new(FileTokenStore::new(&path)));
    assert!(!after_logout.is_authenticated());
}

#[test]
fn test_session_corrupt_file_starts_signed_out() {
    let dir = temp_test_dir("fleet-session");
    let path = dir.path().join("session.json");
    std::fs::write(&path, b"{ this is not a session").unwrap();

    let session = SessionContext::initialize(Arc::new(FileTokenStore::new(&path)));
    assert!(!session.is_authenticated());
    assert!(!session.has_permission(Permission::ViewDashboard));
    assert!(session.navigation().is_empty());
    assert!(!path.exists());

    let token = jwt().issue_for("o-1", "dispatcher").unwrap();
    assert_eq!(
        session.establish(token, user("o-1", Role::Dispatcher)),
        Ok(Persistence::Stored)
    );
    assert!(FileTokenStore::new(&path).load().unwrap().is_some());
}

#[test]
fn test_session_expired_stored_token_is_discarded() {
    let expired = jwt()
        .issue(&Claims::new("o-1", "fleet_manager", -5))
        .unwrap();
    let store = Arc::new(CountingTokenStore::with_session(StoredSession {
        token: expired,
        user: user("o-1", Role::FleetManager),
    }));

    let session = SessionContext::initialize(store.clone());
    assert!(!session.is_authenticated());
    assert_eq!(store.loads(), 1);
    assert_eq!(store.clears(), 1);
    assert!(store.stored().is_none());
}

// =============================================================================
// Updates
// =============================================================================

#[test]
fn test_session_relogin_replaces_everything() {
    let store = Arc::new(CountingTokenStore::new());
    let session = SessionContext::initialize(store.clone());
    let manager = jwt();

    session
        .establish(
            manager.issue_for("o-1", "dispatcher").unwrap(),
            user("o-1", Role::Dispatcher),
        )
        .unwrap();
    assert!(session.has_permission(Permission::CreateTrip));

    session
        .establish(
            manager.issue_for("o-2", "financial_analyst").unwrap(),
            user("o-2", Role::FinancialAnalyst),
        )
        .unwrap();

    assert_eq!(session.user().unwrap().id, "o-2");
    assert!(!session.has_permission(Permission::CreateTrip));
    assert!(session.has_permission(Permission::ViewAnalytics));
    assert_eq!(store.saves(), 2);
    assert_eq!(store.stored().unwrap().user.id, "o-2");
}

#[test]
fn test_session_bad_token_leaves_state_untouched() {
    let session = SessionContext::in_memory();
    let token = jwt().issue_for("o-1", "safety_officer").unwrap();
    session
        .establish(token.clone(), user("o-1", Role::SafetyOfficer))
        .unwrap();

    assert!(session
        .establish("garbage", user("o-2", Role::FleetManager))
        .is_err());

    assert_eq!(session.token(), Some(token));
    assert_eq!(session.role(), Some(Role::SafetyOfficer));
}

#[test]
fn test_session_role_comes_from_token() {
    // The user record claims fleet_manager; the token says dispatcher.
    let session = SessionContext::in_memory();
    session
        .establish(
            jwt().issue_for("o-1", "dispatcher").unwrap(),
            user("o-1", Role::FleetManager),
        )
        .unwrap();

    assert_eq!(session.role(), Some(Role::Dispatcher));
    assert!(!session.is_admin());
}

#[test]
fn test_session_store_failures_do_not_block_login() {
    let session = SessionContext::initialize(Arc::new(FailingTokenStore));
    let persistence = session
        .establish(
            jwt().issue_for("o-1", "fleet_manager").unwrap(),
            user("o-1", Role::FleetManager),
        )
        .unwrap();
    assert_eq!(persistence, Persistence::MemoryOnly);
    assert!(session.is_admin());

    session.logout();
    assert!(!session.is_authenticated());
}

#[test]
fn test_session_clones_share_state() {
    let session = SessionContext::in_memory();
    let view = session.clone();

    session
        .establish(
            jwt().issue_for("o-1", "fleet_manager").unwrap(),
            user("o-1", Role::FleetManager),
        )
        .unwrap();
    assert!(view.is_authenticated());

    view.logout();
    assert!(!session.is_authenticated());
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn test_session_ends_when_server_rejects_token() {
    let app = TestApp::new();

    // Signed elsewhere: decodes on the client, fails verification on the server.
    let foreign = JwtManager::new(fleet_auth::JwtConfig::new(
        "another-deployment-secret-0123456789abcdef",
    ))
    .unwrap();
    let session = SessionContext::in_memory();
    session
        .establish(
            foreign.issue_for("o-1", "fleet_manager").unwrap(),
            user("o-1", Role::FleetManager),
        )
        .unwrap();

    let token = session.token().unwrap();
    let response = app.get("/vehicles", Some(&token)).await;
    response.assert_error(403, "AUTH_INVALID");

    assert_eq!(
        session.handle_rejection(response.status.as_u16(), response.error_code()),
        Some(SessionEvent::ReauthenticationRequired)
    );
    assert!(!session.is_authenticated());
}

#[test]
fn test_session_ignores_other_statuses() {
    let session = SessionContext::in_memory();
    session
        .establish(
            jwt().issue_for("o-1", "dispatcher").unwrap(),
            user("o-1", Role::Dispatcher),
        )
        .unwrap();

    for (status, code) in [
        (400, "VALIDATION_ERROR"),
        (403, "FORBIDDEN"),
        (404, "NOT_FOUND"),
        (409, "CONFLICT"),
        (500, "INTERNAL_ERROR"),
    ] {
        assert_eq!(session.handle_rejection(status, Some(code)), None);
    }
    assert!(session.is_authenticated());

    assert_eq!(
        session.handle_rejection(401, Some("INVALID_CREDENTIALS")),
        Some(SessionEvent::ReauthenticationRequired)
    );
    assert!(!session.is_authenticated());
}

#[test]
fn test_file_store_round_trip() {
    let dir = temp_test_dir("fleet-store");
    let store = FileTokenStore::new(dir.path().join("s.json"));
    assert!(store.load().unwrap().is_none());

    let session = StoredSession {
        token: "t".to_string(),
        user: user("o-1", Role::Dispatcher),
    };
    store.save(&session).unwrap();
    assert_eq!(store.load().unwrap(), Some(session));

    store.clear().unwrap();
    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
}
