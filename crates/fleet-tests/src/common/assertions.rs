// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertions over [`TestResponse`] that print the body on failure.

use super::harness::TestResponse;

impl TestResponse {
    /// Assert the HTTP status.
    #[track_caller]
    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "Expected status {}, got {} with body {}",
            expected,
            self.status,
            self.body
        );
        self
    }

    /// Assert a success envelope with the given status.
    #[track_caller]
    pub fn assert_success(&self, expected: u16) -> &Self {
        self.assert_status(expected);
        assert_eq!(
            self.body["success"], true,
            "Expected a success envelope, got {}",
            self.body
        );
        self
    }

    /// Assert an error envelope with the given status and code.
    #[track_caller]
    pub fn assert_error(&self, expected_status: u16, expected_code: &str) -> &Self {
        self.assert_status(expected_status);
        assert_eq!(
            self.error_code(),
            Some(expected_code),
            "Expected error code {}, got body {}",
            expected_code,
            self.body
        );
        self
    }

    /// Assert that a string never appears anywhere in the body.
    #[track_caller]
    pub fn assert_body_excludes(&self, needle: &str) -> &Self {
        assert!(
            !self.body.to_string().contains(needle),
            "Body unexpectedly contains {:?}: {}",
            needle,
            self.body
        );
        self
    }
}

/// Assert two floats are equal within a tolerance.
#[track_caller]
pub fn assert_approx(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "Expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}
