use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::VehicleStatus;
use service::vehicle::domain::{CreateVehicle, UpdateVehicle, Vehicle, VehicleFilter};

use crate::errors::ApiError;
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Case-insensitive substring of the registration number.
    pub registration_no: Option<String>,
    pub vehicle_type_id: Option<Uuid>,
    /// AVAILABLE, IN_OPERATION, MAINTENANCE or OUT_OF_SERVICE.
    pub status: Option<String>,
}

impl TryFrom<ListQuery> for VehicleFilter {
    type Error = ApiError;

    fn try_from(q: ListQuery) -> Result<Self, Self::Error> {
        let status = q.status.as_deref().map(str::parse::<VehicleStatus>).transpose()?;
        Ok(VehicleFilter { registration_no: q.registration_no, vehicle_type_id: q.vehicle_type_id, status })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", post(create).get(list))
        .route("/vehicles/by-type/:vehicle_type_id", get(by_type))
        .route("/vehicles/:id", get(get_one).patch(update).delete(remove))
}

#[utoipa::path(
    post, path = "/api/vehicles", tag = "vehicles",
    request_body = crate::openapi::CreateVehicleDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::VehicleDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Vehicle type not found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Registration number already exists", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateVehicle>,
) -> Result<(StatusCode, Json<Vehicle>), ApiError> {
    let created = state.vehicles.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/vehicles", tag = "vehicles",
    params(ListQuery),
    responses(
        (status = 200, description = "Ordered by registration number", body = [crate::openapi::VehicleDoc]),
        (status = 400, description = "Bad query", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let list = state.vehicles.find_all(q.try_into()?).await?;
    info!(count = list.len(), "list vehicles");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/vehicles/by-type/{vehicleTypeId}", tag = "vehicles",
    params(("vehicleTypeId" = Uuid, Path, description = "Vehicle type id")),
    responses(
        (status = 200, description = "Vehicles of that type", body = [crate::openapi::VehicleDoc]),
        (status = 404, description = "Vehicle type not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn by_type(
    State(state): State<AppState>,
    ApiPath(vehicle_type_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    Ok(Json(state.vehicles.find_by_vehicle_type(vehicle_type_id).await?))
}

#[utoipa::path(
    get, path = "/api/vehicles/{id}", tag = "vehicles",
    params(("id" = Uuid, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::VehicleDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_one(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<Vehicle>, ApiError> {
    Ok(Json(state.vehicles.find_by_id(id).await?))
}

#[utoipa::path(
    patch, path = "/api/vehicles/{id}", tag = "vehicles",
    params(("id" = Uuid, Path, description = "Vehicle id")),
    request_body = crate::openapi::UpdateVehicleDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::VehicleDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Vehicle or vehicle type not found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Registration number already exists", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<UpdateVehicle>,
) -> Result<Json<Vehicle>, ApiError> {
    Ok(Json(state.vehicles.update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/vehicles/{id}", tag = "vehicles",
    params(("id" = Uuid, Path, description = "Vehicle id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, ApiError> {
    state.vehicles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
