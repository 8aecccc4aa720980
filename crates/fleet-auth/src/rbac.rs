// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-Based Access Control (RBAC).
//!
//! The role → permission table is static data compiled into the binary. The
//! query functions take the role as a raw, optional string because that is
//! what arrives from tokens and stored sessions: a missing or unrecognised
//! role simply holds no permissions.

use super::permission::PermissionSet;
use super::{Permission, Role};

use Permission::*;

const FLEET_MANAGER: &[Permission] = &[
    ViewDashboard,
    ViewVehicles,
    ViewTrips,
    ViewDrivers,
    ViewMaintenance,
    ViewFuelLogs,
    ViewAnalytics,
    CreateVehicle,
    EditVehicle,
    DeleteVehicle,
    CreateTrip,
    EditTrip,
    DeleteTrip,
    CreateDriver,
    EditDriver,
    DeleteDriver,
    CreateMaintenance,
    EditMaintenance,
    DeleteMaintenance,
    CreateFuelLog,
    EditFuelLog,
    DeleteFuelLog,
    ManageCalendar,
    ViewComplaints,
    ManageSafetyScores,
    ViewDriverLicenseExpiry,
    CalculateRoi,
];

const DISPATCHER: &[Permission] = &[
    ViewDashboard,
    ViewVehicles,
    ViewTrips,
    ViewDrivers,
    CreateTrip,
];

const SAFETY_OFFICER: &[Permission] = &[
    ViewDashboard,
    ViewMaintenance,
    ViewDrivers,
    ViewVehicles,
    ViewDriverLicenseExpiry,
    ViewComplaints,
    ManageSafetyScores,
];

const FINANCIAL_ANALYST: &[Permission] = &[
    ViewDashboard,
    ViewFuelLogs,
    ViewMaintenance,
    ViewAnalytics,
    ViewVehicles,
    CalculateRoi,
];

impl Role {
    /// Returns the permissions granted to this role.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::FleetManager => FLEET_MANAGER,
            Role::Dispatcher => DISPATCHER,
            Role::SafetyOfficer => SAFETY_OFFICER,
            Role::FinancialAnalyst => FINANCIAL_ANALYST,
        }
    }

    /// Returns `true` if this role holds the permission.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Returns the permissions of this role as a set.
    pub fn permission_set(&self) -> PermissionSet {
        PermissionSet::from_permissions(self.permissions().iter().copied())
    }
}

fn resolve(role: Option<&str>) -> Option<Role> {
    role.and_then(Role::parse)
}

/// Returns the permissions of a raw role; empty for a missing or unknown role.
pub fn role_permissions(role: Option<&str>) -> PermissionSet {
    resolve(role)
        .map(|r| r.permission_set())
        .unwrap_or_default()
}

/// Returns `true` if the role holds the permission.
pub fn has_permission(role: Option<&str>, permission: Permission) -> bool {
    resolve(role).is_some_and(|r| r.has_permission(permission))
}

/// Returns `true` if the role holds at least one of the permissions.
pub fn has_any_permission(role: Option<&str>, permissions: &[Permission]) -> bool {
    match resolve(role) {
        Some(r) => permissions.iter().any(|p| r.has_permission(*p)),
        None => false,
    }
}

/// Returns `true` if the role holds every one of the permissions.
///
/// A missing or empty role is `false` even for an empty list.
pub fn has_all_permissions(role: Option<&str>, permissions: &[Permission]) -> bool {
    match role.filter(|raw| !raw.is_empty()) {
        None => false,
        Some(raw) => permissions
            .iter()
            .all(|p| has_permission(Some(raw), *p)),
    }
}

/// Returns `true` if the role is the administrative role.
pub fn is_admin(role: Option<&str>) -> bool {
    resolve(role).is_some_and(|r| r.is_admin())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_exhaustive() {
        for role in Role::all() {
            for permission in Permission::all() {
                let listed = role.permissions().contains(permission);
                assert_eq!(
                    has_permission(Some(role.as_str()), *permission),
                    listed,
                    "{role} / {permission}"
                );
            }
        }
    }

    #[test]
    fn test_fleet_manager_holds_everything() {
        assert_eq!(
            Role::FleetManager.permission_set().len(),
            Permission::all().len()
        );
    }

    #[test]
    fn test_dispatcher_only_creates_trips() {
        let role = Some("dispatcher");
        assert!(has_permission(role, Permission::CreateTrip));
        assert!(has_permission(role, Permission::ViewVehicles));
        assert!(!has_permission(role, Permission::CreateVehicle));
        assert!(!has_permission(role, Permission::EditTrip));
        assert!(!has_permission(role, Permission::ViewAnalytics));
    }

    #[test]
    fn test_missing_or_unknown_role_fails_closed() {
        for permission in Permission::all() {
            assert!(!has_permission(None, *permission));
            assert!(!has_permission(Some("unknown_role"), *permission));
            assert!(!has_permission(Some(""), *permission));
        }
        assert!(role_permissions(Some("unknown_role")).is_empty());
        assert!(role_permissions(None).is_empty());
    }

    #[test]
    fn test_has_any_permission() {
        let analyst = Some("financial_analyst");
        assert!(has_any_permission(
            analyst,
            &[Permission::CreateVehicle, Permission::CalculateRoi]
        ));
        assert!(!has_any_permission(
            analyst,
            &[Permission::CreateVehicle, Permission::CreateTrip]
        ));
        assert!(!has_any_permission(analyst, &[]));
        assert!(!has_any_permission(None, &[Permission::ViewDashboard]));
    }

    #[test]
    fn test_has_all_permissions() {
        let safety = Some("safety_officer");
        assert!(has_all_permissions(
            safety,
            &[Permission::ViewComplaints, Permission::ManageSafetyScores]
        ));
        assert!(!has_all_permissions(
            safety,
            &[Permission::ViewComplaints, Permission::ViewAnalytics]
        ));
        assert!(has_all_permissions(safety, &[]));
        assert!(!has_all_permissions(None, &[]));
    }

    #[test]
    fn test_empty_role_is_no_role() {
        assert!(!has_all_permissions(Some(""), &[]));
        assert!(!has_all_permissions(Some(""), &[Permission::ViewDashboard]));
        assert!(!is_admin(Some("")));
    }

    #[test]
    fn test_is_admin() {
        assert!(is_admin(Some("fleet_manager")));
        assert!(!is_admin(Some("dispatcher")));
        assert!(!is_admin(None));
    }
}
