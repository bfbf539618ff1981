use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub type VehicleType = models::vehicle_type::Model;

/// Create payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleType {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

/// Partial update. `description` and `capacity` accept `null` to clear the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update"))]
pub struct UpdateVehicleType {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_ext::nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::serde_ext::nullable", skip_serializing_if = "Option::is_none")]
    pub capacity: Option<Option<i32>>,
}

fn validate_update(input: &UpdateVehicleType) -> Result<(), ValidationError> {
    if let Some(Some(d)) = &input.description {
        if d.chars().count() > 500 {
            return Err(ValidationError::new("length").with_message("description must be at most 500 characters".into()));
        }
    }
    if let Some(Some(c)) = input.capacity {
        if c < 1 {
            return Err(ValidationError::new("range").with_message("capacity must be a positive integer".into()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleTypeFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
}
