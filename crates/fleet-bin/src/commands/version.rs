// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `fleet version`: component versions and the security defaults baked into
//! this build.

use crate::cli::Cli;
use crate::error::BinResult;

fn sections() -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    vec![
        (
            "Components",
            vec![
                ("fleet-bin", crate::VERSION.to_string()),
                ("fleet-api", fleet_api::VERSION.to_string()),
                ("fleet-auth", fleet_auth::VERSION.to_string()),
                ("fleet-config", fleet_config::VERSION.to_string()),
            ],
        ),
        (
            "Platform",
            vec![
                ("arch", std::env::consts::ARCH.to_string()),
                ("os", std::env::consts::OS.to_string()),
            ],
        ),
        (
            "Security defaults",
            vec![
                (
                    "token lifetime",
                    format!("{}h", fleet_auth::DEFAULT_TOKEN_TTL_SECS / 3600),
                ),
                ("bcrypt cost", fleet_auth::DEFAULT_BCRYPT_COST.to_string()),
            ],
        ),
    ]
}

/// Prints version and build details to stdout.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("fleet {} (fleet management API server)", crate::VERSION);
    for (title, rows) in sections() {
        println!();
        println!("{}:", title);
        for (label, value) in rows {
            println!("  {:<16}{}", label, value);
        }
    }
    println!();
    println!("PolyForm Noncommercial License 1.0.0, (c) 2025 Sylvex");
    Ok(())
}
