// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Password hashing and verification.
//!
//! This is the only place in the platform that hashes or checks passwords.

use crate::error::{AuthError, AuthResult};

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Salted one-way password hashing backed by bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Creates a hasher with the given bcrypt cost.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Returns the configured cost.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Failures are faults (invalid cost, allocation failure) and propagate.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        bcrypt::hash(password, self.cost).map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Checks a password against a stored hash.
    ///
    /// A mismatch, a malformed hash or any comparison failure is `false`.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::debug!(error = %e, "Password comparison failed");
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("secret1").unwrap();

        assert!(hasher.verify("secret1", &hash));
        assert!(!hasher.verify("secret2", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();
        let first = hasher.hash("same-password").unwrap();
        let second = hasher.hash("same-password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same-password", &first));
        assert!(hasher.verify("same-password", &second));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hash = hasher().hash("plaintext-marker").unwrap();
        assert!(!hash.contains("plaintext-marker"));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        assert!(!hasher().verify("secret1", "not-a-bcrypt-hash"));
        assert!(!hasher().verify("secret1", ""));
    }

    #[test]
    fn test_invalid_cost_is_an_error() {
        let result = PasswordHasher::new(2).hash("secret1");
        assert!(matches!(result, Err(AuthError::PasswordHash(_))));
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(PasswordHasher::default().cost(), 10);
    }
}
