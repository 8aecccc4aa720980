// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! State handed to every handler through axum's `State` extractor.
//!
//! Cloning an [`AppState`] clones a handful of `Arc`s; the stores behind them
//! synchronize internally.

use std::sync::{Arc, OnceLock};

use fleet_auth::{JwtManager, PasswordHasher};

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::store::{InMemoryOfficerStore, OfficerStore, RecordStore};

/// Plaintext behind [`AppState::decoy_hash`]; never a valid login.
const DECOY_PASSWORD: &str = "fleet-login-decoy";

/// Services shared by the request handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ApiConfig>,
    tokens: Arc<JwtManager>,
    hasher: PasswordHasher,
    officers: Arc<dyn OfficerStore>,
    records: Arc<RecordStore>,
    decoy_hash: Arc<OnceLock<String>>,
}

impl AppState {
    /// Starts an [`AppStateBuilder`].
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }

    /// Settings the server was built with.
    pub fn config(&self) -> &Arc<ApiConfig> {
        &self.config
    }

    /// Token issuer and verifier.
    pub fn jwt(&self) -> &Arc<JwtManager> {
        &self.tokens
    }

    /// bcrypt hasher configured with the signup cost.
    pub fn hasher(&self) -> PasswordHasher {
        self.hasher
    }

    /// bcrypt digest that a login for an unknown e-mail is compared against,
    /// so it costs the same as a wrong password.
    ///
    /// Hashed on first use at the configured cost, which blocks; call it off
    /// the async runtime.
    pub fn decoy_hash(&self) -> &str {
        self.decoy_hash
            .get_or_init(|| match self.hasher.hash(DECOY_PASSWORD) {
                Ok(hash) => hash,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to prepare login decoy hash");
                    String::new()
                }
            })
    }

    /// Registered officers.
    pub fn officers(&self) -> &Arc<dyn OfficerStore> {
        &self.officers
    }

    /// Vehicles, trips, drivers and logs.
    pub fn records(&self) -> &RecordStore {
        &self.records
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("base_path", &self.config.base_path)
            .field("tokens", &self.tokens)
            .field("bcrypt_cost", &self.hasher.cost())
            .finish_non_exhaustive()
    }
}

/// Assembles an [`AppState`]; anything not supplied gets an in-memory
/// default.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    tokens: Option<Arc<JwtManager>>,
    officers: Option<Arc<dyn OfficerStore>>,
    records: Option<Arc<RecordStore>>,
}

impl AppStateBuilder {
    /// Server settings.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses an existing token manager instead of one derived from
    /// `config.jwt`.
    pub fn jwt_manager(mut self, manager: Arc<JwtManager>) -> Self {
        self.tokens = Some(manager);
        self
    }

    /// Replaces the officer store.
    pub fn officers(mut self, store: Arc<dyn OfficerStore>) -> Self {
        self.officers = Some(store);
        self
    }

    /// Replaces the record store.
    pub fn records(mut self, store: Arc<RecordStore>) -> Self {
        self.records = Some(store);
        self
    }

    /// Fails only when a token manager has to be created and the
    /// configuration carries no signing secret.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();
        let tokens = match self.tokens {
            Some(tokens) => tokens,
            None => Arc::new(JwtManager::new(config.jwt.clone())?),
        };

        Ok(AppState {
            hasher: PasswordHasher::new(config.bcrypt_cost),
            config: Arc::new(config),
            tokens,
            officers: self
                .officers
                .unwrap_or_else(|| Arc::new(InMemoryOfficerStore::new())),
            records: self.records.unwrap_or_default(),
            decoy_hash: Arc::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Resource;
    use fleet_auth::JwtConfig;

    fn config() -> ApiConfig {
        ApiConfig::default()
            .with_jwt(JwtConfig::new("state-test-secret-that-is-long-enough"))
            .with_bcrypt_cost(4)
    }

    #[test]
    fn test_defaults_fill_missing_parts() {
        let state = AppState::builder().config(config()).build().unwrap();

        assert_eq!(state.hasher().cost(), 4);
        assert_eq!(state.jwt().expiration_secs(), 8 * 3600);
        assert_eq!(state.records().count(Resource::Vehicles), 0);
        assert!(format!("{:?}", state).contains("bcrypt_cost: 4"));
    }

    #[test]
    fn test_decoy_hash_uses_configured_cost() {
        let state = AppState::builder().config(config()).build().unwrap();
        let copy = state.clone();

        let hash = state.decoy_hash();
        assert!(hash.starts_with("$2b$04$"), "{hash}");
        assert!(!state.hasher().verify("", hash));
        // Computed once and shared between clones.
        assert!(std::ptr::eq(hash, copy.decoy_hash()));
    }

    #[test]
    fn test_missing_secret_fails() {
        assert!(AppState::builder().config(ApiConfig::default()).build().is_err());
    }

    #[test]
    fn test_injected_manager_skips_secret_check() {
        let manager = Arc::new(
            JwtManager::new(JwtConfig::new("injected-secret-that-is-long-enough")).unwrap(),
        );
        let state = AppState::builder()
            .jwt_manager(manager.clone())
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(state.jwt(), &manager));
    }

    #[test]
    fn test_records_store_is_shared() {
        let records = Arc::new(RecordStore::new());
        let state = AppState::builder()
            .config(config())
            .records(records.clone())
            .build()
            .unwrap();

        records
            .create(Resource::Trips, serde_json::json!({}))
            .unwrap();
        assert_eq!(state.records().count(Resource::Trips), 1);
    }
}
