// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, response::IntoResponse};
use fleet_auth::{navigation_items_for, Role, RoleInfo, SessionUser};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{Auth, ClientIp, ValidatedJson};
use crate::response::{ApiResponse, LoginResponse, MeResponse, SignupResponse};
use crate::state::AppState;
use crate::store::NewOfficer;

/// Trims an optional field, treating blank as missing.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Signup
// =============================================================================

/// Signup request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name.
    pub full_name: Option<String>,
    /// E-mail.
    pub email: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Role name.
    pub role: Option<String>,
}

struct ValidSignup {
    full_name: String,
    email: String,
    password: String,
    role: Role,
}

impl SignupRequest {
    fn validate(self) -> ApiResult<ValidSignup> {
        let mut errors = ValidationErrors::new();

        let full_name = present(&self.full_name);
        if full_name.is_none() {
            errors.add("fullName", "Full name is required");
        }

        let email = present(&self.email);
        match email {
            None => errors.add("email", "Email is required"),
            Some(e) if !e.contains('@') => errors.add("email", "Email is not valid"),
            Some(_) => {}
        }

        // Whitespace is part of the password; only an empty one is missing.
        let password = self.password.as_deref().filter(|p| !p.is_empty());
        if password.is_none() {
            errors.add("password", "Password is required");
        }

        let role = match present(&self.role) {
            None => {
                errors.add("role", "Role is required");
                None
            }
            Some(raw) => {
                let role = Role::parse(raw);
                if role.is_none() {
                    errors.add("role", format!("Unknown role '{}'", raw));
                }
                role
            }
        };

        match (full_name, email, password, role) {
            (Some(full_name), Some(email), Some(password), Some(role)) if errors.is_empty() => {
                Ok(ValidSignup {
                    full_name: full_name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    role,
                })
            }
            _ => Err(ApiError::validation_with_errors(
                "All fields are required",
                errors,
            )),
        }
    }
}

/// POST {base}/auth/signup
///
/// Registers an officer and returns the stored record without credentials.
pub async fn signup(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let signup = request.validate()?;

    let hasher = state.hasher();
    let password = signup.password;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

    let officer = state
        .officers()
        .create(NewOfficer {
            full_name: signup.full_name,
            email: signup.email,
            password_hash,
            role: signup.role,
        })
        .await?;

    tracing::info!(
        officer_id = %officer.id,
        role = %officer.role,
        client_ip = ?client_ip,
        "Officer registered"
    );

    Ok(ApiResponse::created(SignupResponse {
        officer: officer.summary(),
    })
    .with_message("Officer registered successfully"))
}

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// E-mail.
    pub email: Option<String>,
    /// Password.
    pub password: Option<String>,
}

/// POST {base}/auth/login
///
/// Checks credentials and issues a session token. An unknown e-mail and a
/// wrong password produce the same response.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = ValidationErrors::new();
    let email = present(&request.email);
    if email.is_none() {
        errors.add("email", "Email is required");
    }
    let password = request.password.clone().filter(|p| !p.is_empty());
    if password.is_none() {
        errors.add("password", "Password is required");
    }
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::validation_with_errors(
            "Email and password are required",
            errors,
        ));
    };

    let officer = state.officers().find_by_email(email).await?;
    let stored_hash = officer.as_ref().map(|o| o.password_hash.clone());
    if !password_matches(&state, password, stored_hash).await? {
        match &officer {
            Some(officer) => tracing::debug!(
                officer_id = %officer.id,
                client_ip = ?client_ip,
                "Login with wrong password"
            ),
            None => tracing::debug!(client_ip = ?client_ip, "Login for unknown email"),
        }
        return Err(ApiError::InvalidCredentials);
    }
    let Some(officer) = officer else {
        return Err(ApiError::InvalidCredentials);
    };

    let token = state
        .jwt()
        .issue_for(&officer.id.to_string(), officer.role.as_str())?;

    tracing::info!(officer_id = %officer.id, role = %officer.role, "Officer logged in");

    Ok(ApiResponse::success(LoginResponse {
        token,
        user: SessionUser {
            id: officer.id.to_string(),
            full_name: officer.full_name,
            role: officer.role.as_str().to_string(),
        },
    })
    .with_message("Login successful"))
}

/// Runs exactly one bcrypt comparison on the blocking pool. Without a stored
/// hash the comparison is made against the decoy and always fails.
async fn password_matches(
    state: &AppState,
    password: String,
    stored_hash: Option<String>,
) -> ApiResult<bool> {
    let state = state.clone();
    let matches = tokio::task::spawn_blocking(move || {
        let hasher = state.hasher();
        match stored_hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => {
                let _ = hasher.verify(&password, state.decoy_hash());
                false
            }
        }
    })
    .await?;
    Ok(matches)
}

// =============================================================================
// Current User
// =============================================================================

/// GET {base}/auth/me
///
/// Returns the caller's identity, permissions and navigation.
pub async fn current_user(Auth(auth_ctx): Auth) -> ApiResult<impl IntoResponse> {
    let navigation = navigation_items_for(Some(&auth_ctx.role));

    Ok(ApiResponse::success(MeResponse {
        permissions: auth_ctx.permissions.tags(),
        id: auth_ctx.user_id,
        role: auth_ctx.role,
        navigation,
    }))
}

// =============================================================================
// Role Catalog
// =============================================================================

/// GET {base}/auth/roles
///
/// Lists the roles an officer can sign up with.
pub async fn roles() -> impl IntoResponse {
    let roles: Vec<RoleInfo> = Role::all().iter().map(Role::info).collect();
    ApiResponse::success(roles)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request(full_name: &str, email: &str, password: &str, role: &str) -> SignupRequest {
        SignupRequest {
            full_name: Some(full_name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            role: Some(role.to_string()),
        }
    }

    fn field_names(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation { fields, .. } => {
                fields.field_names().into_iter().map(String::from).collect()
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_signup() {
        let valid = request(" A ", "a@x.com", "secret1", "dispatcher")
            .validate()
            .ok()
            .unwrap();
        assert_eq!(valid.full_name, "A");
        assert_eq!(valid.role, Role::Dispatcher);
    }

    #[test]
    fn test_missing_fields_reported_per_field() {
        let err = SignupRequest::default().validate().err().unwrap();
        assert_eq!(
            field_names(err),
            vec!["fullName", "email", "password", "role"]
        );
    }

    #[test]
    fn test_blank_fields_are_missing() {
        let err = request("  ", "a@x.com", "secret1", "dispatcher")
            .validate()
            .err()
            .unwrap();
        assert_eq!(field_names(err), vec!["fullName"]);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = request("A", "a@x.com", "secret1", "admin")
            .validate()
            .err()
            .unwrap();
        assert_eq!(field_names(err), vec!["role"]);
    }

    #[test]
    fn test_email_needs_at_sign() {
        let err = request("A", "not-an-email", "secret1", "dispatcher")
            .validate()
            .err()
            .unwrap();
        assert_eq!(field_names(err), vec!["email"]);
    }

    fn state() -> AppState {
        let config = crate::config::ApiConfig::default()
            .with_jwt(fleet_auth::JwtConfig::new("auth-handler-secret-that-is-long-enough"))
            .with_bcrypt_cost(4);
        AppState::builder().config(config).build().unwrap()
    }

    fn login_request(email: &str, password: &str) -> ValidatedJson<LoginRequest> {
        ValidatedJson(LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        })
    }

    #[tokio::test]
    async fn test_unknown_email_is_compared_against_decoy() {
        let state = state();
        let known = state.hasher().hash("secret1").unwrap();

        assert!(password_matches(&state, "secret1".into(), Some(known.clone()))
            .await
            .unwrap());
        assert!(!password_matches(&state, "wrong".into(), Some(known))
            .await
            .unwrap());
        assert!(!password_matches(&state, "secret1".into(), None)
            .await
            .unwrap());
        assert!(state.decoy_hash().starts_with("$2b$04$"));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let state = state();
        state
            .officers()
            .create(NewOfficer {
                full_name: "Known Officer".to_string(),
                email: "known@fleet.io".to_string(),
                password_hash: state.hasher().hash("secret1").unwrap(),
                role: Role::Dispatcher,
            })
            .await
            .unwrap();

        let unknown = login(
            State(state.clone()),
            ClientIp(None),
            login_request("nobody@fleet.io", "secret1"),
        )
        .await
        .err()
        .unwrap();
        let wrong = login(
            State(state.clone()),
            ClientIp(None),
            login_request("known@fleet.io", "not-it"),
        )
        .await
        .err()
        .unwrap();

        assert!(matches!(unknown, ApiError::InvalidCredentials));
        assert!(matches!(wrong, ApiError::InvalidCredentials));

        let ok = login(
            State(state),
            ClientIp(None),
            login_request("known@fleet.io", "secret1"),
        )
        .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_roles_lists_catalog() {
        let response = roles().await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
