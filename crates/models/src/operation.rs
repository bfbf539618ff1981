use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{operation_requirement, status::OperationStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operation")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: OperationStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Requirement }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Requirement => Entity::has_many(operation_requirement::Entity).into(),
        }
    }
}

impl Related<operation_requirement::Entity> for Entity {
    fn to() -> RelationDef { Relation::Requirement.def() }
}

impl ActiveModelBehavior for ActiveModel {}
