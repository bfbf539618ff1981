use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{CreateVehicle, UpdateVehicle, Vehicle, VehicleFilter};
use crate::errors::ServiceError;
use crate::repository::CrudRepository;

/// Persistence for vehicles.
#[async_trait]
pub trait VehicleRepository: CrudRepository<Vehicle, CreateVehicle, UpdateVehicle, VehicleFilter> {
    async fn find_by_registration_no(&self, registration_no: &str) -> Result<Option<Vehicle>, ServiceError>;
    async fn find_by_vehicle_type(&self, vehicle_type_id: Uuid) -> Result<Vec<Vehicle>, ServiceError>;
}
