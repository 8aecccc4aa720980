// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Dashboard navigation gated by permission.

use serde::Serialize;

use crate::{has_permission, Permission};

/// A dashboard navigation entry and the permission that reveals it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Client route.
    #[serde(rename = "to")]
    pub path: &'static str,
    /// Menu label.
    pub label: &'static str,
    /// Icon name understood by the dashboard.
    pub icon: &'static str,
    /// Permission required to see the entry.
    pub permission: Permission,
}

/// Navigation entries in menu order.
pub const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        path: "/app",
        label: "Dashboard",
        icon: "LayoutDashboard",
        permission: Permission::ViewDashboard,
    },
    NavItem {
        path: "/app/vehicles",
        label: "Vehicles",
        icon: "Truck",
        permission: Permission::ViewVehicles,
    },
    NavItem {
        path: "/app/trips",
        label: "Trips",
        icon: "Route",
        permission: Permission::ViewTrips,
    },
    NavItem {
        path: "/app/drivers",
        label: "Drivers",
        icon: "Users",
        permission: Permission::ViewDrivers,
    },
    NavItem {
        path: "/app/maintenance",
        label: "Maintenance",
        icon: "Wrench",
        permission: Permission::ViewMaintenance,
    },
    NavItem {
        path: "/app/fuel",
        label: "Fuel Logs",
        icon: "Fuel",
        permission: Permission::ViewFuelLogs,
    },
    NavItem {
        path: "/app/analytics",
        label: "Analytics",
        icon: "BarChart3",
        permission: Permission::ViewAnalytics,
    },
];

/// Returns the entries visible to a role, in menu order.
pub fn navigation_items_for(role: Option<&str>) -> Vec<&'static NavItem> {
    NAV_ITEMS
        .iter()
        .filter(|item| has_permission(role, item.permission))
        .collect()
}
