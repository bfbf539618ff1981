use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::OperationStatus;
use service::operation::domain::{
    CreateOperation, Operation, OperationFilter, OperationRequirement, RequirementQuantity, UpdateOperation,
};

use crate::errors::ApiError;
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// PLANNING, ACTIVE, COMPLETED or CANCELLED.
    pub status: Option<String>,
    /// Only operations requiring this vehicle type.
    pub vehicle_type_id: Option<Uuid>,
}

impl TryFrom<ListQuery> for OperationFilter {
    type Error = ApiError;

    fn try_from(q: ListQuery) -> Result<Self, Self::Error> {
        let status = q.status.as_deref().map(str::parse::<OperationStatus>).transpose()?;
        Ok(OperationFilter { name: q.name, status, vehicle_type_id: q.vehicle_type_id })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/operations", post(create).get(list))
        .route("/operations/by-type/:vehicle_type_id", get(by_type))
        .route("/operations/:id", get(get_one).patch(update).delete(remove))
        .route("/operations/:id/requirements", post(add_requirement))
        .route(
            "/operations/:id/requirements/:vehicle_type_id",
            patch(update_requirement).delete(remove_requirement),
        )
}

#[utoipa::path(
    post, path = "/api/operations", tag = "operations",
    request_body = crate::openapi::CreateOperationDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::OperationDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Vehicle type not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateOperation>,
) -> Result<(StatusCode, Json<Operation>), ApiError> {
    let created = state.operations.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/operations", tag = "operations",
    params(ListQuery),
    responses(
        (status = 200, description = "Newest first", body = [crate::openapi::OperationDoc]),
        (status = 400, description = "Bad query", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Operation>>, ApiError> {
    let list = state.operations.find_all(q.try_into()?).await?;
    info!(count = list.len(), "list operations");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/operations/by-type/{vehicleTypeId}", tag = "operations",
    params(("vehicleTypeId" = Uuid, Path, description = "Vehicle type id")),
    responses((status = 200, description = "Operations requiring that type", body = [crate::openapi::OperationDoc]))
)]
pub async fn by_type(
    State(state): State<AppState>,
    ApiPath(vehicle_type_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Operation>>, ApiError> {
    Ok(Json(state.operations.find_by_vehicle_type(vehicle_type_id).await?))
}

#[utoipa::path(
    get, path = "/api/operations/{id}", tag = "operations",
    params(("id" = Uuid, Path, description = "Operation id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::OperationDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_one(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<Operation>, ApiError> {
    Ok(Json(state.operations.find_by_id(id).await?))
}

#[utoipa::path(
    patch, path = "/api/operations/{id}", tag = "operations",
    params(("id" = Uuid, Path, description = "Operation id")),
    request_body = crate::openapi::UpdateOperationDoc,
    responses(
        (status = 200, description = "Updated; a supplied requirements list replaces the stored one", body = crate::openapi::OperationDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Operation or vehicle type not found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Status transition not allowed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<UpdateOperation>,
) -> Result<Json<Operation>, ApiError> {
    Ok(Json(state.operations.update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/operations/{id}", tag = "operations",
    params(("id" = Uuid, Path, description = "Operation id")),
    responses(
        (status = 204, description = "Deleted with its requirements"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, ApiError> {
    state.operations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post, path = "/api/operations/{id}/requirements", tag = "operations",
    params(("id" = Uuid, Path, description = "Operation id")),
    request_body = crate::openapi::RequirementDoc,
    responses(
        (status = 200, description = "Requirement inserted or its quantity overwritten", body = crate::openapi::OperationDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Operation or vehicle type not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn add_requirement(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<OperationRequirement>,
) -> Result<Json<Operation>, ApiError> {
    Ok(Json(state.operations.add_requirement(id, input).await?))
}

#[utoipa::path(
    patch, path = "/api/operations/{id}/requirements/{vehicleTypeId}", tag = "operations",
    params(
        ("id" = Uuid, Path, description = "Operation id"),
        ("vehicleTypeId" = Uuid, Path, description = "Vehicle type id")
    ),
    request_body = crate::openapi::QuantityDoc,
    responses(
        (status = 200, description = "Quantity updated", body = crate::openapi::OperationDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Operation or requirement not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_requirement(
    State(state): State<AppState>,
    ApiPath((id, vehicle_type_id)): ApiPath<(Uuid, Uuid)>,
    ValidatedJson(input): ValidatedJson<RequirementQuantity>,
) -> Result<Json<Operation>, ApiError> {
    let requirement = OperationRequirement { vehicle_type_id, quantity: input.quantity };
    Ok(Json(state.operations.update_requirement(id, requirement).await?))
}

#[utoipa::path(
    delete, path = "/api/operations/{id}/requirements/{vehicleTypeId}", tag = "operations",
    params(
        ("id" = Uuid, Path, description = "Operation id"),
        ("vehicleTypeId" = Uuid, Path, description = "Vehicle type id")
    ),
    responses(
        (status = 204, description = "Removed"),
        (status = 404, description = "No such requirement", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn remove_requirement(
    State(state): State<AppState>,
    ApiPath((id, vehicle_type_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    if state.operations.remove_requirement(id, vehicle_type_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Operation requirement not found"))
    }
}
