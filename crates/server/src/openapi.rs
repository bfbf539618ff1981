use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDoc { pub status_code: u16, pub error: String, pub message: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatusDoc { Available, InOperation, Maintenance, OutOfService }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatusDoc { Planning, Active, Completed, Cancelled }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleTypeDoc {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    #[schema(example = "2024-06-01T08:00:00+00:00")]
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct CreateVehicleTypeDoc {
    #[schema(min_length = 1, max_length = 100)]
    pub name: String,
    #[schema(max_length = 500)]
    pub description: Option<String>,
    #[schema(minimum = 1)]
    pub capacity: Option<i32>,
}

/// `null` clears `description` or `capacity`.
#[derive(Serialize, ToSchema)]
pub struct UpdateVehicleTypeDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDoc {
    pub id: Uuid,
    pub registration_no: String,
    pub vehicle_type_id: Uuid,
    pub status: VehicleStatusDoc,
    pub vehicle_type: Option<VehicleTypeDoc>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleDoc {
    #[schema(min_length = 1, max_length = 20)]
    pub registration_no: String,
    pub vehicle_type_id: Uuid,
    pub status: Option<VehicleStatusDoc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleDoc {
    pub registration_no: Option<String>,
    pub vehicle_type_id: Option<Uuid>,
    pub status: Option<VehicleStatusDoc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDoc {
    pub vehicle_type_id: Uuid,
    #[schema(minimum = 1)]
    pub quantity: i32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDetailDoc {
    pub id: Uuid,
    pub operation_id: Uuid,
    pub vehicle_type_id: Uuid,
    pub quantity: i32,
    pub vehicle_type: Option<VehicleTypeDoc>,
}

#[derive(Serialize, ToSchema)]
pub struct QuantityDoc {
    #[schema(minimum = 1)]
    pub quantity: i32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationDoc {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: OperationStatusDoc,
    pub requirements: Vec<RequirementDetailDoc>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct CreateOperationDoc {
    #[schema(min_length = 1, max_length = 100)]
    pub name: String,
    #[schema(max_length = 500)]
    pub description: Option<String>,
    pub status: Option<OperationStatusDoc>,
    /// At least one entry, each vehicle type once.
    pub requirements: Vec<RequirementDoc>,
}

/// A present `requirements` list replaces the stored list.
#[derive(Serialize, ToSchema)]
pub struct UpdateOperationDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<OperationStatusDoc>,
    pub requirements: Option<Vec<RequirementDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::vehicle_types::create,
        crate::routes::vehicle_types::list,
        crate::routes::vehicle_types::get_one,
        crate::routes::vehicle_types::update,
        crate::routes::vehicle_types::remove,
        crate::routes::vehicles::create,
        crate::routes::vehicles::list,
        crate::routes::vehicles::by_type,
        crate::routes::vehicles::get_one,
        crate::routes::vehicles::update,
        crate::routes::vehicles::remove,
        crate::routes::operations::create,
        crate::routes::operations::list,
        crate::routes::operations::by_type,
        crate::routes::operations::get_one,
        crate::routes::operations::update,
        crate::routes::operations::remove,
        crate::routes::operations::add_requirement,
        crate::routes::operations::update_requirement,
        crate::routes::operations::remove_requirement,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            VehicleStatusDoc,
            OperationStatusDoc,
            VehicleTypeDoc,
            CreateVehicleTypeDoc,
            UpdateVehicleTypeDoc,
            VehicleDoc,
            CreateVehicleDoc,
            UpdateVehicleDoc,
            RequirementDoc,
            RequirementDetailDoc,
            QuantityDoc,
            OperationDoc,
            CreateOperationDoc,
            UpdateOperationDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "vehicle-types"),
        (name = "vehicles"),
        (name = "operations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::{json, Value};
    use service::operation::domain::{
        CreateOperation, Operation, OperationRequirement, RequirementQuantity, UpdateOperation,
    };
    use service::vehicle::domain::{CreateVehicle, UpdateVehicle, Vehicle};
    use service::vehicle_type::domain::{CreateVehicleType, UpdateVehicleType, VehicleType};

    use super::*;
    use crate::errors::ErrorBody;

    fn schema_keys(doc: &Value, name: &str) -> BTreeSet<String> {
        doc["components"]["schemas"][name]["properties"]
            .as_object()
            .unwrap_or_else(|| panic!("no schema {name}"))
            .keys()
            .cloned()
            .collect()
    }

    fn wire_keys<T: serde::de::DeserializeOwned + Serialize>(sample: Value) -> BTreeSet<String> {
        let typed: T = serde_json::from_value(sample).unwrap();
        serde_json::to_value(&typed).unwrap().as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn doc_schemas_match_wire_types() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let id = Uuid::new_v4();
        let ts = "2024-06-01T08:00:00+00:00";
        let vehicle_type = json!({
            "id": id, "name": "Van", "description": "d", "capacity": 8, "createdAt": ts, "updatedAt": ts
        });
        let requirement = json!({
            "id": id, "operationId": id, "vehicleTypeId": id, "quantity": 2, "vehicleType": vehicle_type
        });
        let operation = json!({
            "id": id, "name": "op", "description": "d", "status": "PLANNING",
            "requirements": [requirement], "createdAt": ts, "updatedAt": ts
        });
        let vehicle = json!({
            "id": id, "registrationNo": "V-1", "vehicleTypeId": id, "status": "AVAILABLE",
            "vehicleType": vehicle_type, "createdAt": ts, "updatedAt": ts
        });
        let pair = json!({"vehicleTypeId": id, "quantity": 2});

        let cases = [
            ("VehicleTypeDoc", wire_keys::<VehicleType>(vehicle_type.clone())),
            ("VehicleDoc", wire_keys::<Vehicle>(vehicle)),
            ("OperationDoc", wire_keys::<Operation>(operation)),
            ("RequirementDoc", wire_keys::<OperationRequirement>(pair.clone())),
            ("QuantityDoc", wire_keys::<RequirementQuantity>(json!({"quantity": 2}))),
            ("CreateVehicleTypeDoc", wire_keys::<CreateVehicleType>(json!({"name": "Van", "description": "d", "capacity": 8}))),
            ("UpdateVehicleTypeDoc", wire_keys::<UpdateVehicleType>(json!({"name": "Van", "description": "d", "capacity": 8}))),
            ("CreateVehicleDoc", wire_keys::<CreateVehicle>(json!({"registrationNo": "V-1", "vehicleTypeId": id, "status": "AVAILABLE"}))),
            ("UpdateVehicleDoc", wire_keys::<UpdateVehicle>(json!({"registrationNo": "V-1", "vehicleTypeId": id, "status": "AVAILABLE"}))),
            ("CreateOperationDoc", wire_keys::<CreateOperation>(json!({"name": "op", "description": "d", "status": "ACTIVE", "requirements": [pair]}))),
            ("UpdateOperationDoc", wire_keys::<UpdateOperation>(json!({"name": "op", "description": "d", "status": "ACTIVE", "requirements": []}))),
        ];
        for (name, wire) in cases {
            assert_eq!(schema_keys(&doc, name), wire, "{name} drifted from its wire type");
        }

        let detail_keys: BTreeSet<String> = requirement.as_object().unwrap().keys().cloned().collect();
        assert_eq!(schema_keys(&doc, "RequirementDetailDoc"), detail_keys);

        let error = ErrorBody { status_code: 404, error: "NotFoundError", message: "x".into() };
        let error_keys: BTreeSet<String> =
            serde_json::to_value(&error).unwrap().as_object().unwrap().keys().cloned().collect();
        assert_eq!(schema_keys(&doc, "ErrorDoc"), error_keys);
    }

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/api/vehicle-types",
            "/api/vehicle-types/{id}",
            "/api/vehicles/by-type/{vehicleTypeId}",
            "/api/operations/{id}/requirements",
            "/api/operations/{id}/requirements/{vehicleTypeId}",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected}");
        }
    }
}
