use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{operation, vehicle_type};

/// One line of an operation's demand: `quantity` vehicles of a vehicle type.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operation_requirement")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub operation_id: Uuid,
    pub vehicle_type_id: Uuid,
    pub quantity: i32,
    pub position: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Operation, VehicleType }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Operation => Entity::belongs_to(operation::Entity)
                .from(Column::OperationId)
                .to(operation::Column::Id)
                .into(),
            Relation::VehicleType => Entity::belongs_to(vehicle_type::Entity)
                .from(Column::VehicleTypeId)
                .to(vehicle_type::Column::Id)
                .into(),
        }
    }
}

impl Related<operation::Entity> for Entity {
    fn to() -> RelationDef { Relation::Operation.def() }
}

impl Related<vehicle_type::Entity> for Entity {
    fn to() -> RelationDef { Relation::VehicleType.def() }
}

impl ActiveModelBehavior for ActiveModel {}
