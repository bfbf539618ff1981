use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{CreateVehicleType, UpdateVehicleType, VehicleType, VehicleTypeFilter};
use super::repository::VehicleTypeRepository;
use crate::errors::ServiceError;
use crate::repository::CrudRepository;

/// Vehicle type business rules: names are unique, ids must exist.
pub struct VehicleTypeService<R: VehicleTypeRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: VehicleTypeRepository + ?Sized> VehicleTypeService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a vehicle type, rejecting a name that is already taken.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::storage::MemoryStore;
    /// use service::vehicle_type::{VehicleTypeService, domain::CreateVehicleType};
    /// let store = MemoryStore::new();
    /// let svc = VehicleTypeService::new(Arc::new(store.vehicle_types()));
    /// let input = CreateVehicleType { name: "Sedan".into(), description: None, capacity: Some(5) };
    /// let created = tokio_test::block_on(svc.create(input.clone())).unwrap();
    /// assert_eq!(created.name, "Sedan");
    /// assert!(tokio_test::block_on(svc.create(input)).is_err());
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateVehicleType) -> Result<VehicleType, ServiceError> {
        if self.repo.find_by_name(&input.name).await?.is_some() {
            debug!("vehicle type name taken");
            return Err(ServiceError::conflict(format!("Vehicle type with name '{}' already exists", input.name)));
        }
        let created = self.repo.create(input).await?;
        info!(entity = "vehicle_type", id = %created.id, "created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<VehicleType, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("Vehicle type"))
    }

    pub async fn find_all(&self, filter: VehicleTypeFilter) -> Result<Vec<VehicleType>, ServiceError> {
        self.repo.find_all(filter).await
    }

    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateVehicleType) -> Result<VehicleType, ServiceError> {
        self.find_by_id(id).await?;

        if let Some(name) = input.name.as_deref() {
            if let Some(existing) = self.repo.find_by_name(name).await? {
                if existing.id != id {
                    debug!(other = %existing.id, "vehicle type name taken");
                    return Err(ServiceError::conflict(format!("Vehicle type with name '{}' already exists", name)));
                }
            }
        }

        let updated = self.repo.update(id, input).await?;
        info!(entity = "vehicle_type", id = %updated.id, "updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.find_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(entity = "vehicle_type", id = %id, "deleted");
        Ok(())
    }
}
