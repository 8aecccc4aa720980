// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Building blocks shared by the integration suites.
//!
//! [`harness`] drives the real router in-process, [`fixtures`] produces
//! officers and fleet records, [`assertions`] checks response envelopes and
//! [`mocks`] offers instrumented token stores for session tests.

pub mod assertions;
pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use assertions::*;
pub use fixtures::*;
pub use harness::*;
pub use mocks::*;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

const DEFAULT_TEST_FILTER: &str = "warn,fleet_api=debug,fleet_auth=debug";

/// Routes `tracing` output through the test writer. Safe to call from every
/// test; only the first call installs a subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_test_logging() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Scratch directory removed when the returned guard drops.
pub fn temp_test_dir(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .unwrap_or_else(|e| panic!("cannot create scratch dir '{}': {}", prefix, e))
}
