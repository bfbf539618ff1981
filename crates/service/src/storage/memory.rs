//! In-process storage backend.
//!
//! The three repository handles share one set of tables behind a
//! `tokio::sync::RwLock` and apply the same constraints as the SQL schema:
//! unique names and registration numbers, vehicle types cannot be deleted
//! while referenced, requirements go away with their operation.
//!
//! Rows are stored without their embedded vehicle types; those are joined
//! on the way out so renames show up everywhere.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::operation::domain::{
    CreateOperation, Operation, OperationFilter, OperationRequirement, RequirementDetail, UpdateOperation,
};
use crate::operation::repository::OperationRepository;
use crate::repository::CrudRepository;
use crate::storage::sql::matches_ci;
use crate::vehicle::domain::{CreateVehicle, UpdateVehicle, Vehicle, VehicleFilter};
use crate::vehicle::repository::VehicleRepository;
use crate::vehicle_type::domain::{CreateVehicleType, UpdateVehicleType, VehicleType, VehicleTypeFilter};
use crate::vehicle_type::repository::VehicleTypeRepository;

/// Rows kept in insertion order.
#[derive(Debug, Default)]
struct Tables {
    vehicle_types: Vec<VehicleType>,
    vehicles: Vec<Vehicle>,
    operations: Vec<Operation>,
}

impl Tables {
    fn vehicle_type_exists(&self, id: Uuid) -> bool {
        self.vehicle_types.iter().any(|t| t.id == id)
    }

    fn require_vehicle_type(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.vehicle_type_exists(id) {
            Ok(())
        } else {
            Err(ServiceError::conflict(format!("referenced vehicle type {id} does not exist")))
        }
    }

    fn require_vehicle_types(&self, reqs: &[OperationRequirement]) -> Result<(), ServiceError> {
        reqs.iter().try_for_each(|r| self.require_vehicle_type(r.vehicle_type_id))
    }

    fn name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.vehicle_types.iter().any(|t| t.name == name && Some(t.id) != except)
    }

    fn registration_taken(&self, registration_no: &str, except: Option<Uuid>) -> bool {
        self.vehicles.iter().any(|v| v.registration_no == registration_no && Some(v.id) != except)
    }

    fn vehicle_type_referenced(&self, id: Uuid) -> bool {
        self.vehicles.iter().any(|v| v.vehicle_type_id == id)
            || self.operations.iter().any(|o| o.requirement(id).is_some())
    }

    fn operation_mut(&mut self, id: Uuid) -> Result<&mut Operation, ServiceError> {
        self.operations.iter_mut().find(|o| o.id == id).ok_or_else(|| ServiceError::not_found("Operation"))
    }

    fn vehicle_type(&self, id: Uuid) -> Option<VehicleType> {
        self.vehicle_types.iter().find(|t| t.id == id).cloned()
    }

    fn joined_vehicle(&self, mut vehicle: Vehicle) -> Vehicle {
        vehicle.vehicle_type = self.vehicle_type(vehicle.vehicle_type_id);
        vehicle
    }

    fn joined_operation(&self, mut operation: Operation) -> Operation {
        for r in &mut operation.requirements {
            r.vehicle_type = self.vehicle_type(r.vehicle_type_id);
        }
        operation
    }
}

fn stored_requirements(operation_id: Uuid, reqs: Vec<OperationRequirement>) -> Vec<RequirementDetail> {
    reqs.into_iter().map(|r| RequirementDetail::new(operation_id, r)).collect()
}

fn now() -> DateTime<FixedOffset> {
    Utc::now().into()
}

fn unique_violation(what: &str) -> ServiceError {
    ServiceError::conflict(format!("unique constraint violated: {what}"))
}

/// Shared tables plus factories for the per-entity repositories.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vehicle_types(&self) -> MemoryVehicleTypeRepository {
        MemoryVehicleTypeRepository { tables: self.tables.clone() }
    }

    pub fn vehicles(&self) -> MemoryVehicleRepository {
        MemoryVehicleRepository { tables: self.tables.clone() }
    }

    pub fn operations(&self) -> MemoryOperationRepository {
        MemoryOperationRepository { tables: self.tables.clone() }
    }
}

#[derive(Clone)]
pub struct MemoryVehicleTypeRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl CrudRepository<VehicleType, CreateVehicleType, UpdateVehicleType, VehicleTypeFilter> for MemoryVehicleTypeRepository {
    async fn create(&self, input: CreateVehicleType) -> Result<VehicleType, ServiceError> {
        let mut t = self.tables.write().await;
        if t.name_taken(&input.name, None) {
            return Err(unique_violation("vehicle_type.name"));
        }
        let ts = now();
        let row = VehicleType {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            capacity: input.capacity,
            created_at: ts,
            updated_at: ts,
        };
        t.vehicle_types.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VehicleType>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.vehicle_types.iter().find(|v| v.id == id).cloned())
    }

    async fn find_all(&self, filter: VehicleTypeFilter) -> Result<Vec<VehicleType>, ServiceError> {
        let t = self.tables.read().await;
        let mut rows: Vec<VehicleType> = t
            .vehicle_types
            .iter()
            .filter(|v| filter.name.as_deref().map_or(true, |n| matches_ci(&v.name, n)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update(&self, id: Uuid, input: UpdateVehicleType) -> Result<VehicleType, ServiceError> {
        let mut t = self.tables.write().await;
        if let Some(name) = input.name.as_deref() {
            if t.name_taken(name, Some(id)) {
                return Err(unique_violation("vehicle_type.name"));
            }
        }
        let row = t
            .vehicle_types
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| ServiceError::not_found("Vehicle type"))?;
        if let Some(name) = input.name { row.name = name; }
        if let Some(description) = input.description { row.description = description; }
        if let Some(capacity) = input.capacity { row.capacity = capacity; }
        row.updated_at = now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.tables.write().await;
        if t.vehicle_type_referenced(id) {
            return Err(ServiceError::conflict("record is still referenced: vehicle type is in use"));
        }
        let before = t.vehicle_types.len();
        t.vehicle_types.retain(|v| v.id != id);
        Ok(t.vehicle_types.len() < before)
    }
}

#[async_trait]
impl VehicleTypeRepository for MemoryVehicleTypeRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<VehicleType>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.vehicle_types.iter().find(|v| v.name == name).cloned())
    }
}

#[derive(Clone)]
pub struct MemoryVehicleRepository {
    tables: Arc<RwLock<Tables>>,
}

fn sort_vehicles(rows: &mut [Vehicle]) {
    rows.sort_by(|a, b| a.registration_no.cmp(&b.registration_no));
}

#[async_trait]
impl CrudRepository<Vehicle, CreateVehicle, UpdateVehicle, VehicleFilter> for MemoryVehicleRepository {
    async fn create(&self, input: CreateVehicle) -> Result<Vehicle, ServiceError> {
        let mut t = self.tables.write().await;
        t.require_vehicle_type(input.vehicle_type_id)?;
        if t.registration_taken(&input.registration_no, None) {
            return Err(unique_violation("vehicle.registration_no"));
        }
        let ts = now();
        let row = Vehicle {
            id: Uuid::new_v4(),
            registration_no: input.registration_no,
            vehicle_type_id: input.vehicle_type_id,
            status: input.status.unwrap_or_default(),
            vehicle_type: None,
            created_at: ts,
            updated_at: ts,
        };
        t.vehicles.push(row.clone());
        Ok(t.joined_vehicle(row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.vehicles.iter().find(|v| v.id == id).cloned().map(|v| t.joined_vehicle(v)))
    }

    async fn find_all(&self, filter: VehicleFilter) -> Result<Vec<Vehicle>, ServiceError> {
        let t = self.tables.read().await;
        let mut rows: Vec<Vehicle> = t
            .vehicles
            .iter()
            .filter(|v| filter.registration_no.as_deref().map_or(true, |r| matches_ci(&v.registration_no, r)))
            .filter(|v| filter.vehicle_type_id.map_or(true, |vt| v.vehicle_type_id == vt))
            .filter(|v| filter.status.map_or(true, |s| v.status == s))
            .map(|v| t.joined_vehicle(v.clone()))
            .collect();
        sort_vehicles(&mut rows);
        Ok(rows)
    }

    async fn update(&self, id: Uuid, input: UpdateVehicle) -> Result<Vehicle, ServiceError> {
        let mut t = self.tables.write().await;
        if let Some(vt) = input.vehicle_type_id {
            t.require_vehicle_type(vt)?;
        }
        if let Some(reg) = input.registration_no.as_deref() {
            if t.registration_taken(reg, Some(id)) {
                return Err(unique_violation("vehicle.registration_no"));
            }
        }
        let row = t
            .vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| ServiceError::not_found("Vehicle"))?;
        if let Some(reg) = input.registration_no { row.registration_no = reg; }
        if let Some(vt) = input.vehicle_type_id { row.vehicle_type_id = vt; }
        if let Some(status) = input.status { row.status = status; }
        row.updated_at = now();
        let updated = row.clone();
        Ok(t.joined_vehicle(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.tables.write().await;
        let before = t.vehicles.len();
        t.vehicles.retain(|v| v.id != id);
        Ok(t.vehicles.len() < before)
    }
}

#[async_trait]
impl VehicleRepository for MemoryVehicleRepository {
    async fn find_by_registration_no(&self, registration_no: &str) -> Result<Option<Vehicle>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.vehicles.iter().find(|v| v.registration_no == registration_no).cloned().map(|v| t.joined_vehicle(v)))
    }

    async fn find_by_vehicle_type(&self, vehicle_type_id: Uuid) -> Result<Vec<Vehicle>, ServiceError> {
        self.find_all(VehicleFilter { vehicle_type_id: Some(vehicle_type_id), ..Default::default() }).await
    }
}

#[derive(Clone)]
pub struct MemoryOperationRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl CrudRepository<Operation, CreateOperation, UpdateOperation, OperationFilter> for MemoryOperationRepository {
    async fn create(&self, input: CreateOperation) -> Result<Operation, ServiceError> {
        let mut t = self.tables.write().await;
        t.require_vehicle_types(&input.requirements)?;
        let ts = now();
        let id = Uuid::new_v4();
        let row = Operation {
            id,
            name: input.name,
            description: input.description,
            status: input.status.unwrap_or_default(),
            requirements: stored_requirements(id, input.requirements),
            created_at: ts,
            updated_at: ts,
        };
        t.operations.push(row.clone());
        Ok(t.joined_operation(row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.operations.iter().find(|o| o.id == id).cloned().map(|o| t.joined_operation(o)))
    }

    /// Newest first; rows created within the same instant keep reverse insertion order.
    async fn find_all(&self, filter: OperationFilter) -> Result<Vec<Operation>, ServiceError> {
        let t = self.tables.read().await;
        let mut rows: Vec<Operation> = t
            .operations
            .iter()
            .rev()
            .filter(|o| filter.name.as_deref().map_or(true, |n| matches_ci(&o.name, n)))
            .filter(|o| filter.status.map_or(true, |s| o.status == s))
            .filter(|o| filter.vehicle_type_id.map_or(true, |vt| o.requirement(vt).is_some()))
            .map(|o| t.joined_operation(o.clone()))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update(&self, id: Uuid, input: UpdateOperation) -> Result<Operation, ServiceError> {
        let mut t = self.tables.write().await;
        if let Some(reqs) = input.requirements.as_deref() {
            t.require_vehicle_types(reqs)?;
        }
        let row = t.operation_mut(id)?;
        if let Some(name) = input.name { row.name = name; }
        if let Some(description) = input.description { row.description = description; }
        if let Some(status) = input.status { row.status = status; }
        if let Some(reqs) = input.requirements { row.requirements = stored_requirements(id, reqs); }
        row.updated_at = now();
        let updated = row.clone();
        Ok(t.joined_operation(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.tables.write().await;
        let before = t.operations.len();
        t.operations.retain(|o| o.id != id);
        Ok(t.operations.len() < before)
    }
}

#[async_trait]
impl OperationRepository for MemoryOperationRepository {
    async fn find_by_vehicle_type(&self, vehicle_type_id: Uuid) -> Result<Vec<Operation>, ServiceError> {
        self.find_all(OperationFilter { vehicle_type_id: Some(vehicle_type_id), ..Default::default() }).await
    }

    async fn add_requirement(&self, operation_id: Uuid, requirement: OperationRequirement) -> Result<Operation, ServiceError> {
        let mut t = self.tables.write().await;
        t.require_vehicle_type(requirement.vehicle_type_id)?;
        let row = t.operation_mut(operation_id)?;
        match row.requirements.iter_mut().find(|r| r.vehicle_type_id == requirement.vehicle_type_id) {
            Some(existing) => existing.quantity = requirement.quantity,
            None => row.requirements.push(RequirementDetail::new(operation_id, requirement)),
        }
        row.updated_at = now();
        let updated = row.clone();
        Ok(t.joined_operation(updated))
    }

    async fn remove_requirement(&self, operation_id: Uuid, vehicle_type_id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.tables.write().await;
        let Ok(row) = t.operation_mut(operation_id) else {
            return Ok(false);
        };
        let before = row.requirements.len();
        row.requirements.retain(|r| r.vehicle_type_id != vehicle_type_id);
        let removed = row.requirements.len() < before;
        if removed {
            row.updated_at = now();
        }
        Ok(removed)
    }

    async fn update_requirement(&self, operation_id: Uuid, requirement: OperationRequirement) -> Result<bool, ServiceError> {
        let mut t = self.tables.write().await;
        let Ok(row) = t.operation_mut(operation_id) else {
            return Ok(false);
        };
        match row.requirements.iter_mut().find(|r| r.vehicle_type_id == requirement.vehicle_type_id) {
            Some(existing) => {
                existing.quantity = requirement.quantity;
                row.updated_at = now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
