use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::vehicle_type;

use crate::errors::ServiceError;
use crate::repository::CrudRepository;
use crate::storage::sql::contains_ci;
use crate::vehicle_type::domain::{CreateVehicleType, UpdateVehicleType, VehicleType, VehicleTypeFilter};
use crate::vehicle_type::repository::VehicleTypeRepository;

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmVehicleTypeRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CrudRepository<VehicleType, CreateVehicleType, UpdateVehicleType, VehicleTypeFilter> for SeaOrmVehicleTypeRepository {
    async fn create(&self, input: CreateVehicleType) -> Result<VehicleType, ServiceError> {
        let now = Utc::now().into();
        let am = vehicle_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            capacity: Set(input.capacity),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VehicleType>, ServiceError> {
        Ok(vehicle_type::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_all(&self, filter: VehicleTypeFilter) -> Result<Vec<VehicleType>, ServiceError> {
        let mut select = vehicle_type::Entity::find();
        if let Some(name) = filter.name.as_deref() {
            select = select.filter(contains_ci(vehicle_type::Column::Name, name));
        }
        Ok(select.order_by_asc(vehicle_type::Column::Name).all(&self.db).await?)
    }

    async fn update(&self, id: Uuid, input: UpdateVehicleType) -> Result<VehicleType, ServiceError> {
        let mut am: vehicle_type::ActiveModel = vehicle_type::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Vehicle type"))?
            .into();
        if let Some(name) = input.name { am.name = Set(name); }
        if let Some(description) = input.description { am.description = Set(description); }
        if let Some(capacity) = input.capacity { am.capacity = Set(capacity); }
        am.updated_at = Set(Utc::now().into());
        Ok(am.update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = vehicle_type::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl VehicleTypeRepository for SeaOrmVehicleTypeRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<VehicleType>, ServiceError> {
        Ok(vehicle_type::Entity::find()
            .filter(vehicle_type::Column::Name.eq(name))
            .one(&self.db)
            .await?)
    }
}
