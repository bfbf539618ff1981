use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::{vehicle, vehicle_type};

use crate::errors::ServiceError;
use crate::repository::CrudRepository;
use crate::storage::sql::contains_ci;
use crate::vehicle::domain::{CreateVehicle, UpdateVehicle, Vehicle, VehicleFilter};
use crate::vehicle::repository::VehicleRepository;

/// Every read joins the vehicle type so responses carry it embedded.
#[derive(Clone)]
pub struct SeaOrmVehicleRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmVehicleRepository {
    async fn load_one(&self, id: Uuid) -> Result<Option<Vehicle>, ServiceError> {
        let row = vehicle::Entity::find_by_id(id)
            .find_also_related(vehicle_type::Entity)
            .one(&self.db)
            .await?;
        Ok(row.map(|(v, vt)| Vehicle::from_parts(v, vt)))
    }
}

#[async_trait]
impl CrudRepository<Vehicle, CreateVehicle, UpdateVehicle, VehicleFilter> for SeaOrmVehicleRepository {
    async fn create(&self, input: CreateVehicle) -> Result<Vehicle, ServiceError> {
        let now = Utc::now().into();
        let am = vehicle::ActiveModel {
            id: Set(Uuid::new_v4()),
            registration_no: Set(input.registration_no),
            vehicle_type_id: Set(input.vehicle_type_id),
            status: Set(input.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = am.insert(&self.db).await?;
        self.load_one(model.id).await?.ok_or_else(|| ServiceError::not_found("Vehicle"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, ServiceError> {
        self.load_one(id).await
    }

    async fn find_all(&self, filter: VehicleFilter) -> Result<Vec<Vehicle>, ServiceError> {
        let mut select = vehicle::Entity::find();
        if let Some(reg) = filter.registration_no.as_deref() {
            select = select.filter(contains_ci(vehicle::Column::RegistrationNo, reg));
        }
        if let Some(vt) = filter.vehicle_type_id {
            select = select.filter(vehicle::Column::VehicleTypeId.eq(vt));
        }
        if let Some(status) = filter.status {
            select = select.filter(vehicle::Column::Status.eq(status));
        }
        let rows = select
            .find_also_related(vehicle_type::Entity)
            .order_by_asc(vehicle::Column::RegistrationNo)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(v, vt)| Vehicle::from_parts(v, vt)).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateVehicle) -> Result<Vehicle, ServiceError> {
        let mut am: vehicle::ActiveModel = vehicle::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Vehicle"))?
            .into();
        if let Some(reg) = input.registration_no { am.registration_no = Set(reg); }
        if let Some(vt) = input.vehicle_type_id { am.vehicle_type_id = Set(vt); }
        if let Some(status) = input.status { am.status = Set(status); }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await?;
        self.load_one(id).await?.ok_or_else(|| ServiceError::not_found("Vehicle"))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = vehicle::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl VehicleRepository for SeaOrmVehicleRepository {
    async fn find_by_registration_no(&self, registration_no: &str) -> Result<Option<Vehicle>, ServiceError> {
        let row = vehicle::Entity::find()
            .filter(vehicle::Column::RegistrationNo.eq(registration_no))
            .find_also_related(vehicle_type::Entity)
            .one(&self.db)
            .await?;
        Ok(row.map(|(v, vt)| Vehicle::from_parts(v, vt)))
    }

    async fn find_by_vehicle_type(&self, vehicle_type_id: Uuid) -> Result<Vec<Vehicle>, ServiceError> {
        self.find_all(VehicleFilter { vehicle_type_id: Some(vehicle_type_id), ..Default::default() }).await
    }
}
