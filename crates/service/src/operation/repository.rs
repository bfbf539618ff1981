use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{CreateOperation, Operation, OperationFilter, OperationRequirement, UpdateOperation};
use crate::errors::ServiceError;
use crate::repository::CrudRepository;

/// Persistence for operations and their requirement rows.
#[async_trait]
pub trait OperationRepository:
    CrudRepository<Operation, CreateOperation, UpdateOperation, OperationFilter>
{
    /// Operations with at least one requirement for `vehicle_type_id`, newest first.
    async fn find_by_vehicle_type(&self, vehicle_type_id: Uuid) -> Result<Vec<Operation>, ServiceError>;

    /// Upsert by vehicle type: overwrite the quantity of an existing row or
    /// append a new one. Fails with `NotFound` for an unknown operation.
    async fn add_requirement(&self, operation_id: Uuid, requirement: OperationRequirement) -> Result<Operation, ServiceError>;

    /// Returns whether a row was removed.
    async fn remove_requirement(&self, operation_id: Uuid, vehicle_type_id: Uuid) -> Result<bool, ServiceError>;

    /// Set the quantity of an existing row. Returns whether a row matched.
    async fn update_requirement(&self, operation_id: Uuid, requirement: OperationRequirement) -> Result<bool, ServiceError>;
}
