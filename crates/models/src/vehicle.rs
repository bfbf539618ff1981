use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{status::VehicleStatus, vehicle_type};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicle")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub registration_no: String,
    pub vehicle_type_id: Uuid,
    pub status: VehicleStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { VehicleType }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::VehicleType => Entity::belongs_to(vehicle_type::Entity)
                .from(Column::VehicleTypeId)
                .to(vehicle_type::Column::Id)
                .into(),
        }
    }
}

impl Related<vehicle_type::Entity> for Entity {
    fn to() -> RelationDef { Relation::VehicleType.def() }
}

impl ActiveModelBehavior for ActiveModel {}
