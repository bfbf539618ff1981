use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use models::VehicleStatus;

use crate::vehicle_type::domain::VehicleType;

/// A vehicle with its vehicle type embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub registration_no: String,
    pub vehicle_type_id: Uuid,
    pub status: VehicleStatus,
    pub vehicle_type: Option<VehicleType>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Vehicle {
    pub fn from_parts(model: models::vehicle::Model, vehicle_type: Option<VehicleType>) -> Self {
        Self {
            id: model.id,
            registration_no: model.registration_no,
            vehicle_type_id: model.vehicle_type_id,
            status: model.status,
            vehicle_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create payload. `status` defaults to `AVAILABLE`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicle {
    #[validate(length(min = 1, max = 20))]
    pub registration_no: String,
    pub vehicle_type_id: Uuid,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicle {
    #[validate(length(min = 1, max = 20))]
    pub registration_no: Option<String>,
    pub vehicle_type_id: Option<Uuid>,
    pub status: Option<VehicleStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFilter {
    /// Case-insensitive substring of the registration number.
    pub registration_no: Option<String>,
    pub vehicle_type_id: Option<Uuid>,
    pub status: Option<VehicleStatus>,
}
