use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub use models::OperationStatus;

use crate::vehicle_type::domain::VehicleType;

/// `quantity` vehicles of the given type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequirement {
    pub vehicle_type_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Body of a single requirement quantity change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequirementQuantity {
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// A stored requirement row with its vehicle type embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDetail {
    pub id: Uuid,
    pub operation_id: Uuid,
    pub vehicle_type_id: Uuid,
    pub quantity: i32,
    pub vehicle_type: Option<VehicleType>,
}

impl RequirementDetail {
    /// A fresh row for `operation_id`; the vehicle type is filled in on read.
    pub fn new(operation_id: Uuid, requirement: OperationRequirement) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation_id,
            vehicle_type_id: requirement.vehicle_type_id,
            quantity: requirement.quantity,
            vehicle_type: None,
        }
    }
}

/// An operation together with its requirements, in stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: OperationStatus,
    pub requirements: Vec<RequirementDetail>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Operation {
    /// Assemble from stored rows and their joined vehicle types. `rows` may arrive in any order.
    pub fn from_parts(
        model: models::operation::Model,
        mut rows: Vec<(models::operation_requirement::Model, Option<VehicleType>)>,
    ) -> Self {
        rows.sort_by_key(|(r, _)| r.position);
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            status: model.status,
            requirements: rows
                .into_iter()
                .map(|(r, vehicle_type)| RequirementDetail {
                    id: r.id,
                    operation_id: r.operation_id,
                    vehicle_type_id: r.vehicle_type_id,
                    quantity: r.quantity,
                    vehicle_type,
                })
                .collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    pub fn requirement(&self, vehicle_type_id: Uuid) -> Option<&RequirementDetail> {
        self.requirements.iter().find(|r| r.vehicle_type_id == vehicle_type_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create"))]
pub struct CreateOperation {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<OperationStatus>,
    #[validate(length(min = 1, message = "At least one vehicle type requirement is required"))]
    pub requirements: Vec<OperationRequirement>,
}

/// Partial update. A present `requirements` list replaces the stored set as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update"))]
pub struct UpdateOperation {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_ext::nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    pub status: Option<OperationStatus>,
    pub requirements: Option<Vec<OperationRequirement>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    pub status: Option<OperationStatus>,
    /// Operations with a requirement for this vehicle type.
    pub vehicle_type_id: Option<Uuid>,
}

/// Positive quantities, each vehicle type at most once.
pub fn check_requirements(reqs: &[OperationRequirement]) -> Result<(), ValidationError> {
    if reqs.iter().any(|r| r.quantity < 1) {
        return Err(ValidationError::new("range").with_message("quantity must be a positive integer".into()));
    }
    let mut seen = HashSet::with_capacity(reqs.len());
    if reqs.iter().any(|r| !seen.insert(r.vehicle_type_id)) {
        return Err(ValidationError::new("duplicate")
            .with_message("each vehicle type may appear only once in requirements".into()));
    }
    Ok(())
}

fn validate_create(input: &CreateOperation) -> Result<(), ValidationError> {
    check_requirements(&input.requirements)
}

fn validate_update(input: &UpdateOperation) -> Result<(), ValidationError> {
    if let Some(Some(d)) = &input.description {
        if d.chars().count() > 500 {
            return Err(ValidationError::new("length").with_message("description must be at most 500 characters".into()));
        }
    }
    match &input.requirements {
        Some(reqs) => check_requirements(reqs),
        None => Ok(()),
    }
}
