// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `hash-password` command.

use std::io::{self, Read};

use fleet_auth::PasswordHasher;

use crate::cli::{Cli, HashPasswordArgs};
use crate::error::{BinError, BinResult};

/// Executes the `hash-password` command.
pub fn hash_password(_cli: &Cli, args: HashPasswordArgs) -> BinResult<()> {
    let password = if args.stdin {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| BinError::io(format!("Failed to read from stdin: {}", e)))?;
        input.trim_end_matches(['\r', '\n']).to_string()
    } else {
        args.password.clone().ok_or_else(|| {
            BinError::config("No password provided. Use --stdin or provide a value")
        })?
    };

    println!("{}", hash_with_cost(&password, args.cost)?);
    Ok(())
}

fn hash_with_cost(password: &str, cost: u32) -> BinResult<String> {
    if password.is_empty() {
        return Err(BinError::config("Password cannot be empty"));
    }
    if !(fleet_config::schema::MIN_BCRYPT_COST..=fleet_config::schema::MAX_BCRYPT_COST)
        .contains(&cost)
    {
        return Err(BinError::config(format!(
            "bcrypt cost must be between {} and {}",
            fleet_config::schema::MIN_BCRYPT_COST,
            fleet_config::schema::MAX_BCRYPT_COST
        )));
    }

    Ok(PasswordHasher::new(cost).hash(password)?)
}
