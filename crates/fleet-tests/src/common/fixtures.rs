// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built test data for consistent and reproducible testing.

use fleet_api::{ApiConfig, Resource};
use fleet_auth::{JwtConfig, Role};
use serde_json::{json, Value};

/// Signing secret shared by every suite.
pub const TEST_JWT_SECRET: &str = "integration-test-signing-secret-0123456789";

/// Lowest bcrypt cost the library accepts; keeps signup and login fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Password used by every fixture officer.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

// =============================================================================
// Configuration Fixtures
// =============================================================================

/// Fixture providing server configurations.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// JWT settings signed with [`TEST_JWT_SECRET`].
    pub fn jwt() -> JwtConfig {
        JwtConfig::new(TEST_JWT_SECRET)
    }

    /// Server settings with fast hashing and the default base path.
    pub fn api() -> ApiConfig {
        ApiConfig::new()
            .with_jwt(Self::jwt())
            .with_bcrypt_cost(TEST_BCRYPT_COST)
    }
}

// =============================================================================
// Officer Fixtures
// =============================================================================

/// An officer to sign up with.
#[derive(Debug, Clone)]
pub struct OfficerFixture {
    /// Display name.
    pub full_name: String,
    /// E-mail.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Role name as sent on signup.
    pub role: String,
}

impl OfficerFixture {
    /// A distinct officer for each catalog role.
    pub fn for_role(role: Role) -> Self {
        let name = role.as_str();
        Self {
            full_name: format!("Test {}", role.info().label),
            email: format!("{}@fleet.test", name.replace('_', ".")),
            password: TEST_PASSWORD.to_string(),
            role: name.to_string(),
        }
    }

    /// Replaces the e-mail.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Replaces the role name, which need not be a catalog role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// The signup request body.
    pub fn signup_body(&self) -> Value {
        json!({
            "fullName": self.full_name,
            "email": self.email,
            "password": self.password,
            "role": self.role,
        })
    }

    /// The login request body.
    pub fn login_body(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password,
        })
    }
}

// =============================================================================
// Record Fixtures
// =============================================================================

/// Fixture providing fleet record bodies.
pub struct RecordFixtures;

impl RecordFixtures {
    /// A vehicle with an acquisition cost.
    pub fn vehicle(name: &str, acquisition_cost: f64) -> Value {
        json!({
            "name": name,
            "licensePlate": format!("FL-{}", name.len()),
            "acquisitionCost": acquisition_cost,
        })
    }

    /// A trip for a vehicle.
    pub fn trip(vehicle_id: &str, revenue: f64) -> Value {
        json!({ "vehicleId": vehicle_id, "origin": "Depot", "destination": "Port", "revenue": revenue })
    }

    /// A fuel purchase for a vehicle.
    pub fn fuel_log(vehicle_id: &str, cost: f64) -> Value {
        json!({ "vehicleId": vehicle_id, "liters": 40, "cost": cost })
    }

    /// A maintenance entry for a vehicle.
    pub fn maintenance_log(vehicle_id: &str, cost: f64) -> Value {
        json!({ "vehicleId": vehicle_id, "description": "Brake pads", "cost": cost })
    }

    /// A driver profile.
    pub fn driver(name: &str) -> Value {
        json!({ "name": name, "licenseExpiry": "2030-01-01" })
    }

    /// A plausible body for any resource.
    pub fn for_resource(resource: Resource) -> Value {
        match resource {
            Resource::Vehicles => Self::vehicle("Truck", 50_000.0),
            Resource::Trips => Self::trip("unassigned", 100.0),
            Resource::Drivers => Self::driver("Ana"),
            Resource::FuelLogs => Self::fuel_log("unassigned", 60.0),
            Resource::MaintenanceLogs => Self::maintenance_log("unassigned", 250.0),
        }
    }
}
