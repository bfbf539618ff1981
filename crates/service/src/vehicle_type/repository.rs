use async_trait::async_trait;

use super::domain::{CreateVehicleType, UpdateVehicleType, VehicleType, VehicleTypeFilter};
use crate::errors::ServiceError;
use crate::repository::CrudRepository;

/// Persistence for vehicle types.
#[async_trait]
pub trait VehicleTypeRepository:
    CrudRepository<VehicleType, CreateVehicleType, UpdateVehicleType, VehicleTypeFilter>
{
    /// Exact, case-sensitive match.
    async fn find_by_name(&self, name: &str) -> Result<Option<VehicleType>, ServiceError>;
}
