// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Fleet records: vehicles, trips, drivers and their logs.
//!
//! Records are schemaless JSON objects. The store only owns `id`,
//! `createdAt` and `updatedAt`; every other field is whatever the client sent.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use fleet_auth::Permission;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{StoreError, StoreResult};

// =============================================================================
// Resource
// =============================================================================

/// Kinds of fleet record, each gated by its own permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    /// Vehicles.
    Vehicles,
    /// Trips.
    Trips,
    /// Drivers.
    Drivers,
    /// Fuel logs.
    FuelLogs,
    /// Maintenance logs.
    MaintenanceLogs,
}

impl Resource {
    /// Returns all resources.
    pub fn all() -> &'static [Resource] {
        &[
            Resource::Vehicles,
            Resource::Trips,
            Resource::Drivers,
            Resource::FuelLogs,
            Resource::MaintenanceLogs,
        ]
    }

    /// Returns the URL segment.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Vehicles => "vehicles",
            Resource::Trips => "trips",
            Resource::Drivers => "drivers",
            Resource::FuelLogs => "fuel-logs",
            Resource::MaintenanceLogs => "maintenance-logs",
        }
    }

    /// Returns the singular label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Vehicles => "Vehicle",
            Resource::Trips => "Trip",
            Resource::Drivers => "Driver",
            Resource::FuelLogs => "Fuel log",
            Resource::MaintenanceLogs => "Maintenance log",
        }
    }

    /// Permission needed to read.
    pub fn view_permission(&self) -> Permission {
        match self {
            Resource::Vehicles => Permission::ViewVehicles,
            Resource::Trips => Permission::ViewTrips,
            Resource::Drivers => Permission::ViewDrivers,
            Resource::FuelLogs => Permission::ViewFuelLogs,
            Resource::MaintenanceLogs => Permission::ViewMaintenance,
        }
    }

    /// Permission needed to create.
    pub fn create_permission(&self) -> Permission {
        match self {
            Resource::Vehicles => Permission::CreateVehicle,
            Resource::Trips => Permission::CreateTrip,
            Resource::Drivers => Permission::CreateDriver,
            Resource::FuelLogs => Permission::CreateFuelLog,
            Resource::MaintenanceLogs => Permission::CreateMaintenance,
        }
    }

    /// Permission needed to update.
    pub fn edit_permission(&self) -> Permission {
        match self {
            Resource::Vehicles => Permission::EditVehicle,
            Resource::Trips => Permission::EditTrip,
            Resource::Drivers => Permission::EditDriver,
            Resource::FuelLogs => Permission::EditFuelLog,
            Resource::MaintenanceLogs => Permission::EditMaintenance,
        }
    }

    /// Permission needed to delete.
    pub fn delete_permission(&self) -> Permission {
        match self {
            Resource::Vehicles => Permission::DeleteVehicle,
            Resource::Trips => Permission::DeleteTrip,
            Resource::Drivers => Permission::DeleteDriver,
            Resource::FuelLogs => Permission::DeleteFuelLog,
            Resource::MaintenanceLogs => Permission::DeleteMaintenance,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// =============================================================================
// Record
// =============================================================================

/// A stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Record ID.
    pub id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Client-supplied fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

const RESERVED_FIELDS: &[&str] = &["id", "createdAt", "updatedAt"];

fn into_fields(value: Value) -> StoreResult<Map<String, Value>> {
    match value {
        Value::Object(mut fields) => {
            for key in RESERVED_FIELDS {
                fields.remove(*key);
            }
            Ok(fields)
        }
        other => Err(StoreError::InvalidRecord(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// RecordStore
// =============================================================================

/// Records of every resource kind, kept in process memory.
///
/// Each collection keeps creation order.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<HashMap<Resource, Vec<Record>>>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists records of a kind in creation order.
    pub fn list(&self, resource: Resource) -> Vec<Record> {
        self.records
            .read()
            .get(&resource)
            .map(|records| records.to_vec())
            .unwrap_or_default()
    }

    /// Fetches one record.
    pub fn get(&self, resource: Resource, id: Uuid) -> StoreResult<Record> {
        self.records
            .read()
            .get(&resource)
            .and_then(|records| records.iter().find(|r| r.id == id))
            .cloned()
            .ok_or_else(|| StoreError::not_found(resource.label(), id.to_string()))
    }

    /// Stores a new record built from a JSON object.
    pub fn create(&self, resource: Resource, body: Value) -> StoreResult<Record> {
        let now = Utc::now();
        let record = Record {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
            fields: into_fields(body)?,
        };

        self.records
            .write()
            .entry(resource)
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    /// Merges the top-level fields of `patch` into a record.
    pub fn update(&self, resource: Resource, id: Uuid, patch: Value) -> StoreResult<Record> {
        let patch = into_fields(patch)?;
        let mut records = self.records.write();

        let record = records
            .get_mut(&resource)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| StoreError::not_found(resource.label(), id.to_string()))?;

        record.fields.extend(patch);
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    /// Removes a record and returns it.
    pub fn delete(&self, resource: Resource, id: Uuid) -> StoreResult<Record> {
        self.records
            .write()
            .get_mut(&resource)
            .and_then(|records| {
                let index = records.iter().position(|r| r.id == id)?;
                Some(records.remove(index))
            })
            .ok_or_else(|| StoreError::not_found(resource.label(), id.to_string()))
    }

    /// Counts records of a kind.
    pub fn count(&self, resource: Resource) -> usize {
        self.records
            .read()
            .get(&resource)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_permissions() {
        assert_eq!(Resource::Trips.create_permission(), Permission::CreateTrip);
        assert_eq!(
            Resource::MaintenanceLogs.view_permission(),
            Permission::ViewMaintenance
        );
        assert_eq!(Resource::FuelLogs.delete_permission(), Permission::DeleteFuelLog);
        assert_eq!(Resource::FuelLogs.path(), "fuel-logs");
    }

    #[test]
    fn test_crud_cycle() {
        let store = RecordStore::new();

        let created = store
            .create(Resource::Vehicles, json!({"name": "Van-05", "plate": "AB-123"}))
            .unwrap();
        assert_eq!(store.count(Resource::Vehicles), 1);
        assert_eq!(store.count(Resource::Trips), 0);

        let fetched = store.get(Resource::Vehicles, created.id).unwrap();
        assert_eq!(fetched, created);

        let updated = store
            .update(Resource::Vehicles, created.id, json!({"status": "In Shop"}))
            .unwrap();
        assert_eq!(updated.fields["name"], "Van-05");
        assert_eq!(updated.fields["status"], "In Shop");
        assert!(updated.updated_at >= created.updated_at);

        store.delete(Resource::Vehicles, created.id).unwrap();
        assert!(matches!(
            store.get(Resource::Vehicles, created.id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_resources_are_isolated() {
        let store = RecordStore::new();
        let trip = store.create(Resource::Trips, json!({"origin": "A"})).unwrap();

        assert!(store.get(Resource::Vehicles, trip.id).is_err());
        assert!(store.list(Resource::Vehicles).is_empty());
        assert_eq!(store.list(Resource::Trips).len(), 1);
    }

    #[test]
    fn test_list_in_creation_order() {
        let store = RecordStore::new();
        for n in 0..5 {
            store.create(Resource::Drivers, json!({"n": n})).unwrap();
        }

        let ns: Vec<_> = store
            .list(Resource::Drivers)
            .iter()
            .map(|r| r.fields["n"].as_i64().unwrap())
            .collect();
        assert_eq!(ns, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_reserved_fields_are_ignored() {
        let store = RecordStore::new();
        let record = store
            .create(Resource::Drivers, json!({"id": "forged", "name": "D"}))
            .unwrap();

        assert!(!record.fields.contains_key("id"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], record.id.to_string());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_non_object_rejected() {
        let store = RecordStore::new();
        assert!(matches!(
            store.create(Resource::Trips, json!([1, 2])),
            Err(StoreError::InvalidRecord(_))
        ));
        assert!(matches!(
            store.update(Resource::Trips, Uuid::now_v7(), json!({})),
            Err(StoreError::NotFound { .. })
        ));
    }
}
