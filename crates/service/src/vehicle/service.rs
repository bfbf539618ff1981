use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{CreateVehicle, UpdateVehicle, Vehicle, VehicleFilter};
use super::repository::VehicleRepository;
use crate::errors::ServiceError;
use crate::repository::CrudRepository;
use crate::vehicle_type::repository::VehicleTypeRepository;

/// Vehicle business rules. Every vehicle points at an existing vehicle type
/// and carries a unique registration number.
pub struct VehicleService<R: VehicleRepository + ?Sized, T: VehicleTypeRepository + ?Sized> {
    repo: Arc<R>,
    vehicle_types: Arc<T>,
}

impl<R, T> VehicleService<R, T>
where
    R: VehicleRepository + ?Sized,
    T: VehicleTypeRepository + ?Sized,
{
    pub fn new(repo: Arc<R>, vehicle_types: Arc<T>) -> Self { Self { repo, vehicle_types } }

    async fn ensure_vehicle_type(&self, id: Uuid) -> Result<(), ServiceError> {
        match self.vehicle_types.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => {
                debug!(vehicle_type_id = %id, "unknown vehicle type");
                Err(ServiceError::not_found("Vehicle type"))
            }
        }
    }

    fn registration_taken(registration_no: &str) -> ServiceError {
        ServiceError::conflict(format!("Vehicle with registration number '{}' already exists", registration_no))
    }

    /// Vehicle type existence is checked before registration uniqueness.
    #[instrument(skip(self, input), fields(registration_no = %input.registration_no))]
    pub async fn create(&self, input: CreateVehicle) -> Result<Vehicle, ServiceError> {
        self.ensure_vehicle_type(input.vehicle_type_id).await?;
        if self.repo.find_by_registration_no(&input.registration_no).await?.is_some() {
            debug!("registration number taken");
            return Err(Self::registration_taken(&input.registration_no));
        }
        let created = self.repo.create(input).await?;
        info!(entity = "vehicle", id = %created.id, "created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Vehicle, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("Vehicle"))
    }

    pub async fn find_all(&self, filter: VehicleFilter) -> Result<Vec<Vehicle>, ServiceError> {
        self.repo.find_all(filter).await
    }

    pub async fn find_by_vehicle_type(&self, vehicle_type_id: Uuid) -> Result<Vec<Vehicle>, ServiceError> {
        self.ensure_vehicle_type(vehicle_type_id).await?;
        self.repo.find_by_vehicle_type(vehicle_type_id).await
    }

    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateVehicle) -> Result<Vehicle, ServiceError> {
        self.find_by_id(id).await?;

        if let Some(vt) = input.vehicle_type_id {
            self.ensure_vehicle_type(vt).await?;
        }
        if let Some(reg) = input.registration_no.as_deref() {
            if let Some(existing) = self.repo.find_by_registration_no(reg).await? {
                if existing.id != id {
                    debug!(other = %existing.id, "registration number taken");
                    return Err(Self::registration_taken(reg));
                }
            }
        }

        let updated = self.repo.update(id, input).await?;
        info!(entity = "vehicle", id = %updated.id, status = %updated.status, "updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.find_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(entity = "vehicle", id = %id, "deleted");
        Ok(())
    }
}
