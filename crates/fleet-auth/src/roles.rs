// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role catalog.

use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// The closed set of roles an officer can hold.
///
/// Every officer has exactly one role. Roles are not combinable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administers the whole fleet.
    FleetManager,
    /// Plans trips; read-only on vehicles and drivers.
    Dispatcher,
    /// Watches maintenance, licenses, complaints and safety scores.
    SafetyOfficer,
    /// Read-only access to costs and analytics.
    FinancialAnalyst,
}

impl Role {
    /// Returns all roles in catalog order.
    pub fn all() -> &'static [Role] {
        &[
            Role::FleetManager,
            Role::Dispatcher,
            Role::SafetyOfficer,
            Role::FinancialAnalyst,
        ]
    }

    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::FleetManager => "fleet_manager",
            Role::Dispatcher => "dispatcher",
            Role::SafetyOfficer => "safety_officer",
            Role::FinancialAnalyst => "financial_analyst",
        }
    }

    /// Parses a role from its wire name.
    ///
    /// Matching is exact; anything outside the catalog is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fleet_manager" => Some(Role::FleetManager),
            "dispatcher" => Some(Role::Dispatcher),
            "safety_officer" => Some(Role::SafetyOfficer),
            "financial_analyst" => Some(Role::FinancialAnalyst),
            _ => None,
        }
    }

    /// Returns the display metadata for this role.
    pub fn info(&self) -> RoleInfo {
        let (label, description) = match self {
            Role::FleetManager => ("Fleet Manager", "Oversee fleet operations"),
            Role::Dispatcher => ("Dispatcher", "Coordinate trips and logistics"),
            Role::SafetyOfficer => ("Safety Officer", "Monitor compliance and safety"),
            Role::FinancialAnalyst => ("Financial Analyst", "Track costs and analytics"),
        };

        RoleInfo {
            value: *self,
            label,
            description,
        }
    }

    /// Returns `true` for the administrative role.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::FleetManager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Role Info
// =============================================================================

/// Display metadata for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleInfo {
    /// The role itself.
    pub value: Role,
    /// Human readable name.
    pub label: &'static str,
    /// One line summary of the role's duties.
    pub description: &'static str,
}

/// Formats a raw role string for display.
///
/// Known roles use their catalog label. A missing role shows as `"User"`, and
/// unknown strings are title-cased word by word (`"night_shift"` becomes
/// `"Night Shift"`).
pub fn format_role(role: Option<&str>) -> String {
    let Some(role) = role.filter(|r| !r.is_empty()) else {
        return "User".to_string();
    };

    if let Some(known) = Role::parse(role) {
        return known.info().label.to_string();
    }

    role.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        for role in Role::all() {
            assert_eq!(Role::parse(role.as_str()), Some(*role));
        }
    }

    #[test]
    fn test_role_parse_is_exact() {
        assert_eq!(Role::parse("dispatcher"), Some(Role::Dispatcher));
        assert_eq!(Role::parse("Dispatcher"), None);
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_role_serde_snake_case() {
        let json = serde_json::to_string(&Role::SafetyOfficer).unwrap();
        assert_eq!(json, "\"safety_officer\"");

        let role: Role = serde_json::from_str("\"financial_analyst\"").unwrap();
        assert_eq!(role, Role::FinancialAnalyst);

        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }

    #[test]
    fn test_format_role() {
        assert_eq!(format_role(Some("fleet_manager")), "Fleet Manager");
        assert_eq!(format_role(Some("night_shift_lead")), "Night Shift Lead");
        assert_eq!(format_role(None), "User");
        assert_eq!(format_role(Some("")), "User");
    }

    #[test]
    fn test_only_fleet_manager_is_admin() {
        assert!(Role::FleetManager.is_admin());
        assert!(!Role::Dispatcher.is_admin());
        assert!(!Role::SafetyOfficer.is_admin());
        assert!(!Role::FinancialAnalyst.is_admin());
    }
}
