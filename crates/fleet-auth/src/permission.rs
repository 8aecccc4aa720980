// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Permission definitions for RBAC.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Capabilities a role may hold.
///
/// Permissions are never granted per user; they are derived entirely from the
/// officer's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // =========================================================================
    // Views
    // =========================================================================
    /// Open the dashboard.
    ViewDashboard,
    /// List and inspect vehicles.
    ViewVehicles,
    /// List and inspect trips.
    ViewTrips,
    /// List and inspect drivers.
    ViewDrivers,
    /// List and inspect maintenance logs.
    ViewMaintenance,
    /// List and inspect fuel logs.
    ViewFuelLogs,
    /// Open analytics.
    ViewAnalytics,

    // =========================================================================
    // Vehicles
    // =========================================================================
    /// Register a vehicle.
    CreateVehicle,
    /// Edit a vehicle.
    EditVehicle,
    /// Remove a vehicle.
    DeleteVehicle,

    // =========================================================================
    // Trips
    // =========================================================================
    /// Dispatch a trip.
    CreateTrip,
    /// Edit a trip.
    EditTrip,
    /// Cancel a trip.
    DeleteTrip,

    // =========================================================================
    // Drivers
    // =========================================================================
    /// Add a driver profile.
    CreateDriver,
    /// Edit a driver profile.
    EditDriver,
    /// Remove a driver profile.
    DeleteDriver,

    // =========================================================================
    // Maintenance
    // =========================================================================
    /// Record a maintenance entry.
    CreateMaintenance,
    /// Edit a maintenance entry.
    EditMaintenance,
    /// Remove a maintenance entry.
    DeleteMaintenance,

    // =========================================================================
    // Fuel
    // =========================================================================
    /// Record a fuel purchase.
    CreateFuelLog,
    /// Edit a fuel purchase.
    EditFuelLog,
    /// Remove a fuel purchase.
    DeleteFuelLog,

    // =========================================================================
    // Safety and finance
    // =========================================================================
    /// Manage the maintenance calendar.
    ManageCalendar,
    /// Read complaints filed against drivers.
    ViewComplaints,
    /// Adjust driver safety scores.
    ManageSafetyScores,
    /// See upcoming driver license expiries.
    ViewDriverLicenseExpiry,
    /// Run return-on-investment calculations.
    CalculateRoi,
}

impl Permission {
    /// Returns the permission tag as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::ViewVehicles => "view_vehicles",
            Permission::ViewTrips => "view_trips",
            Permission::ViewDrivers => "view_drivers",
            Permission::ViewMaintenance => "view_maintenance",
            Permission::ViewFuelLogs => "view_fuel_logs",
            Permission::ViewAnalytics => "view_analytics",
            Permission::CreateVehicle => "create_vehicle",
            Permission::EditVehicle => "edit_vehicle",
            Permission::DeleteVehicle => "delete_vehicle",
            Permission::CreateTrip => "create_trip",
            Permission::EditTrip => "edit_trip",
            Permission::DeleteTrip => "delete_trip",
            Permission::CreateDriver => "create_driver",
            Permission::EditDriver => "edit_driver",
            Permission::DeleteDriver => "delete_driver",
            Permission::CreateMaintenance => "create_maintenance",
            Permission::EditMaintenance => "edit_maintenance",
            Permission::DeleteMaintenance => "delete_maintenance",
            Permission::CreateFuelLog => "create_fuel_log",
            Permission::EditFuelLog => "edit_fuel_log",
            Permission::DeleteFuelLog => "delete_fuel_log",
            Permission::ManageCalendar => "manage_calendar",
            Permission::ViewComplaints => "view_complaints",
            Permission::ManageSafetyScores => "manage_safety_scores",
            Permission::ViewDriverLicenseExpiry => "view_driver_license_expiry",
            Permission::CalculateRoi => "calculate_roi",
        }
    }

    /// Parses a permission from its tag.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.as_str() == s)
    }

    /// Returns all available permissions.
    pub fn all() -> &'static [Permission] {
        &[
            Permission::ViewDashboard,
            Permission::ViewVehicles,
            Permission::ViewTrips,
            Permission::ViewDrivers,
            Permission::ViewMaintenance,
            Permission::ViewFuelLogs,
            Permission::ViewAnalytics,
            Permission::CreateVehicle,
            Permission::EditVehicle,
            Permission::DeleteVehicle,
            Permission::CreateTrip,
            Permission::EditTrip,
            Permission::DeleteTrip,
            Permission::CreateDriver,
            Permission::EditDriver,
            Permission::DeleteDriver,
            Permission::CreateMaintenance,
            Permission::EditMaintenance,
            Permission::DeleteMaintenance,
            Permission::CreateFuelLog,
            Permission::EditFuelLog,
            Permission::DeleteFuelLog,
            Permission::ManageCalendar,
            Permission::ViewComplaints,
            Permission::ManageSafetyScores,
            Permission::ViewDriverLicenseExpiry,
            Permission::CalculateRoi,
        ]
    }

    /// Returns `true` for read-only permissions.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Permission::ViewDashboard
                | Permission::ViewVehicles
                | Permission::ViewTrips
                | Permission::ViewDrivers
                | Permission::ViewMaintenance
                | Permission::ViewFuelLogs
                | Permission::ViewAnalytics
                | Permission::ViewComplaints
                | Permission::ViewDriverLicenseExpiry
        )
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Permission Set
// =============================================================================

/// A set of permissions.
///
/// Iteration follows declaration order of [`Permission`], so listings built
/// from a set are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    permissions: BTreeSet<Permission>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a permission set from a list of permissions.
    pub fn from_permissions(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Adds a permission to the set.
    pub fn add(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Returns `true` if the set contains the given permission.
    pub fn contains(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Returns `true` if the set contains all of the given permissions.
    pub fn contains_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.permissions.contains(p))
    }

    /// Returns `true` if the set contains any of the given permissions.
    pub fn contains_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.permissions.contains(p))
    }

    /// Returns the number of permissions in the set.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Returns an iterator over the permissions.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Returns the permission tags in declaration order.
    pub fn tags(&self) -> Vec<&'static str> {
        self.permissions.iter().map(|p| p.as_str()).collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self::from_permissions(iter)
    }
}

// =============================================================================
// Tests
// =============================================================================
