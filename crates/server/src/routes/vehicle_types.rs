use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use service::vehicle_type::domain::{CreateVehicleType, UpdateVehicleType, VehicleType, VehicleTypeFilter};

use crate::errors::ApiError;
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vehicle-types", post(create).get(list))
        .route("/vehicle-types/:id", get(get_one).patch(update).delete(remove))
}

#[utoipa::path(
    post, path = "/api/vehicle-types", tag = "vehicle-types",
    request_body = crate::openapi::CreateVehicleTypeDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::VehicleTypeDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Name already exists", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateVehicleType>,
) -> Result<(StatusCode, Json<VehicleType>), ApiError> {
    let created = state.vehicle_types.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/vehicle-types", tag = "vehicle-types",
    params(ListQuery),
    responses((status = 200, description = "Ordered by name", body = [crate::openapi::VehicleTypeDoc]))
)]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<Vec<VehicleType>>, ApiError> {
    let list = state.vehicle_types.find_all(VehicleTypeFilter { name: q.name }).await?;
    info!(count = list.len(), "list vehicle types");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/vehicle-types/{id}", tag = "vehicle-types",
    params(("id" = Uuid, Path, description = "Vehicle type id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::VehicleTypeDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_one(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<VehicleType>, ApiError> {
    Ok(Json(state.vehicle_types.find_by_id(id).await?))
}

#[utoipa::path(
    patch, path = "/api/vehicle-types/{id}", tag = "vehicle-types",
    params(("id" = Uuid, Path, description = "Vehicle type id")),
    request_body = crate::openapi::UpdateVehicleTypeDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::VehicleTypeDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Name already exists", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<UpdateVehicleType>,
) -> Result<Json<VehicleType>, ApiError> {
    Ok(Json(state.vehicle_types.update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/vehicle-types/{id}", tag = "vehicle-types",
    params(("id" = Uuid, Path, description = "Vehicle type id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Still referenced", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, ApiError> {
    state.vehicle_types.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
