// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Analytics handlers.

use std::collections::HashMap;

use axum::{extract::State, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::store::{Record, RecordStore, Resource};

// =============================================================================
// Summary
// =============================================================================

/// Record counts per resource.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    /// Number of vehicles.
    pub vehicles: usize,
    /// Number of trips.
    pub trips: usize,
    /// Number of drivers.
    pub drivers: usize,
    /// Number of fuel log entries.
    pub fuel_logs: usize,
    /// Number of maintenance log entries.
    pub maintenance_logs: usize,
}

impl FleetSummary {
    fn from_store(store: &RecordStore) -> Self {
        Self {
            vehicles: store.count(Resource::Vehicles),
            trips: store.count(Resource::Trips),
            drivers: store.count(Resource::Drivers),
            fuel_logs: store.count(Resource::FuelLogs),
            maintenance_logs: store.count(Resource::MaintenanceLogs),
        }
    }
}

/// GET {base}/analytics/summary
pub async fn summary(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(ApiResponse::success(FleetSummary::from_store(state.records())))
}

// =============================================================================
// Return on Investment
// =============================================================================

/// Financial figures for one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRoi {
    /// Vehicle record ID.
    pub vehicle_id: String,
    /// Vehicle name, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Trips driven.
    pub total_trips: usize,
    /// Sum of trip revenue.
    pub revenue: f64,
    /// Sum of fuel log costs.
    pub total_fuel_cost: f64,
    /// Fuel plus maintenance cost.
    pub total_operational_cost: f64,
    /// `(revenue - operational cost) / acquisition cost * 100`; absent
    /// without a positive acquisition cost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi: Option<f64>,
}

/// Fleet-wide ROI report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiReport {
    /// Per-vehicle figures, in vehicle creation order.
    pub vehicles: Vec<VehicleRoi>,
    /// Total revenue.
    pub total_revenue: f64,
    /// Total operational cost.
    pub total_operational_cost: f64,
    /// Mean ROI over vehicles that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_roi: Option<f64>,
}

fn number(record: &Record, field: &str) -> f64 {
    match record.fields.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn vehicle_ref(record: &Record) -> Option<String> {
    match record.fields.get("vehicleId")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Default)]
struct Totals {
    trips: usize,
    revenue: f64,
    fuel: f64,
    maintenance: f64,
}

/// Computes the ROI report from the stored records.
///
/// Trips contribute `revenue`, fuel and maintenance logs contribute `cost`,
/// each matched to a vehicle through its `vehicleId` field. Vehicles supply
/// `acquisitionCost`.
pub fn compute_roi(store: &RecordStore) -> RoiReport {
    let mut totals: HashMap<String, Totals> = HashMap::new();

    for trip in store.list(Resource::Trips) {
        if let Some(vehicle) = vehicle_ref(&trip) {
            let entry = totals.entry(vehicle).or_default();
            entry.trips += 1;
            entry.revenue += number(&trip, "revenue");
        }
    }
    for log in store.list(Resource::FuelLogs) {
        if let Some(vehicle) = vehicle_ref(&log) {
            totals.entry(vehicle).or_default().fuel += number(&log, "cost");
        }
    }
    for log in store.list(Resource::MaintenanceLogs) {
        if let Some(vehicle) = vehicle_ref(&log) {
            totals.entry(vehicle).or_default().maintenance += number(&log, "cost");
        }
    }

    let vehicles: Vec<VehicleRoi> = store
        .list(Resource::Vehicles)
        .iter()
        .map(|vehicle| {
            let id = vehicle.id.to_string();
            let t = totals.remove(&id).unwrap_or_default();
            let operational = t.fuel + t.maintenance;
            let acquisition = number(vehicle, "acquisitionCost");

            VehicleRoi {
                name: vehicle
                    .fields
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                vehicle_id: id,
                total_trips: t.trips,
                revenue: t.revenue,
                total_fuel_cost: t.fuel,
                total_operational_cost: operational,
                roi: (acquisition > 0.0).then(|| (t.revenue - operational) / acquisition * 100.0),
            }
        })
        .collect();

    let rois: Vec<f64> = vehicles.iter().filter_map(|v| v.roi).collect();
    let average_roi = (!rois.is_empty()).then(|| rois.iter().sum::<f64>() / rois.len() as f64);

    RoiReport {
        total_revenue: vehicles.iter().map(|v| v.revenue).sum(),
        total_operational_cost: vehicles.iter().map(|v| v.total_operational_cost).sum(),
        average_roi,
        vehicles,
    }
}

/// GET {base}/analytics/roi
pub async fn roi(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(ApiResponse::success(compute_roi(state.records())))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_counts() {
        let store = RecordStore::new();
        store.create(Resource::Vehicles, json!({})).unwrap();
        store.create(Resource::Trips, json!({})).unwrap();
        store.create(Resource::Trips, json!({})).unwrap();

        let summary = FleetSummary::from_store(&store);
        assert_eq!(summary.vehicles, 1);
        assert_eq!(summary.trips, 2);
        assert_eq!(summary.fuel_logs, 0);
    }

    #[test]
    fn test_roi_per_vehicle() {
        let store = RecordStore::new();
        let van = store
            .create(Resource::Vehicles, json!({"name": "Van-05", "acquisitionCost": 1000}))
            .unwrap();
        let truck = store
            .create(Resource::Vehicles, json!({"name": "Truck-01"}))
            .unwrap();
        let van_id = van.id.to_string();

        store
            .create(Resource::Trips, json!({"vehicleId": van_id, "revenue": 500}))
            .unwrap();
        store
            .create(Resource::Trips, json!({"vehicleId": van_id, "revenue": "250.5"}))
            .unwrap();
        store
            .create(Resource::FuelLogs, json!({"vehicleId": van_id, "cost": 100}))
            .unwrap();
        store
            .create(Resource::MaintenanceLogs, json!({"vehicleId": van_id, "cost": 50.5}))
            .unwrap();
        store
            .create(Resource::Trips, json!({"vehicleId": truck.id.to_string(), "revenue": 10}))
            .unwrap();

        let report = compute_roi(&store);
        assert_eq!(report.vehicles.len(), 2);

        let van = &report.vehicles[0];
        assert_eq!(van.name.as_deref(), Some("Van-05"));
        assert_eq!(van.total_trips, 2);
        assert_eq!(van.revenue, 750.5);
        assert_eq!(van.total_fuel_cost, 100.0);
        assert_eq!(van.total_operational_cost, 150.5);
        assert_eq!(van.roi, Some(60.0));

        let truck = &report.vehicles[1];
        assert_eq!(truck.roi, None);
        assert_eq!(report.average_roi, Some(60.0));
        assert_eq!(report.total_revenue, 760.5);
    }

    #[test]
    fn test_roi_empty_fleet() {
        let report = compute_roi(&RecordStore::new());
        assert!(report.vehicles.is_empty());
        assert_eq!(report.average_roi, None);
        assert_eq!(report.total_revenue, 0.0);
    }
}
