use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Response,
    routing::get,
    Json, Router,
};

use super::common::{
    created_response, json_body, month_period, no_content_response, path_params,
    success_response,
};
use crate::entities::{cargo_assignment, vessel};
use crate::errors::{ApiError, ErrorResponse};
use crate::handlers::AppState;
use crate::services::reporting::dto::{VesselDetail, VesselResult, VesselTotals};
use crate::services::vessels::{CargoInput, CargoLine, VesselInput, VesselSummary};

#[utoipa::path(
    get,
    path = "/api/v1/vessels",
    responses(
        (status = 200, description = "All vessels, latest arrival first", body = [VesselSummary])
    ),
    tag = "vessels"
)]
pub async fn list_vessels(State(state): State<AppState>) -> Result<Response, ApiError> {
    let vessels = state.services.vessels.list().await?;
    Ok(success_response(vessels))
}

#[utoipa::path(
    get,
    path = "/api/v1/vessels/month/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Vessels arriving in the month", body = [VesselSummary]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "vessels"
)]
pub async fn list_vessels_by_month(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = month_period(params)?;
    let vessels = state.services.vessels.list_by_month(period).await?;
    Ok(success_response(vessels))
}

#[utoipa::path(
    get,
    path = "/api/v1/vessels/{id}",
    params(("id" = i32, Path, description = "Vessel ID")),
    responses(
        (status = 200, description = "Vessel fetched", body = vessel::Model),
        (status = 404, description = "Vessel not found", body = ErrorResponse)
    ),
    tag = "vessels"
)]
pub async fn get_vessel(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let vessel = state.services.vessels.get(id).await?;
    Ok(success_response(vessel))
}

#[utoipa::path(
    post,
    path = "/api/v1/vessels",
    request_body = VesselInput,
    responses(
        (status = 201, description = "Vessel created", body = vessel::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "vessels"
)]
pub async fn create_vessel(
    State(state): State<AppState>,
    payload: Result<Json<VesselInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let input = json_body(payload)?;
    let vessel = state.services.vessels.create(input).await?;
    Ok(created_response(vessel))
}

#[utoipa::path(
    put,
    path = "/api/v1/vessels/{id}",
    params(("id" = i32, Path, description = "Vessel ID")),
    request_body = VesselInput,
    responses(
        (status = 200, description = "Vessel updated", body = vessel::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Vessel not found", body = ErrorResponse)
    ),
    tag = "vessels"
)]
pub async fn update_vessel(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<VesselInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let input = json_body(payload)?;
    let vessel = state.services.vessels.update(id, input).await?;
    Ok(success_response(vessel))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vessels/{id}",
    params(("id" = i32, Path, description = "Vessel ID")),
    responses(
        (status = 204, description = "Vessel and its cargo deleted"),
        (status = 404, description = "Vessel not found", body = ErrorResponse),
        (status = 409, description = "Vessel still has revenues or expenses", body = ErrorResponse)
    ),
    tag = "vessels"
)]
pub async fn delete_vessel(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    state.services.vessels.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/vessels/{id}/result",
    params(("id" = i32, Path, description = "Vessel ID")),
    responses(
        (status = 200, description = "Revenue, expense and net result of the vessel", body = VesselTotals)
    ),
    tag = "vessels"
)]
pub async fn vessel_result(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let totals = state.services.aggregation.vessel_totals(id).await?;
    Ok(success_response(totals))
}

#[utoipa::path(
    get,
    path = "/api/v1/vessels/results/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Result of every vessel arriving in the month", body = [VesselResult]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "vessels"
)]
pub async fn vessel_results_by_month(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = month_period(params)?;
    let results = state.services.aggregation.vessel_results(period).await?;
    Ok(success_response(results))
}

#[utoipa::path(
    get,
    path = "/api/v1/vessels/{id}/details",
    params(("id" = i32, Path, description = "Vessel ID")),
    responses(
        (status = 200, description = "Cargo, ledger lines and category totals", body = VesselDetail),
        (status = 404, description = "Vessel not found", body = ErrorResponse)
    ),
    tag = "vessels"
)]
pub async fn vessel_details(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let details = state.services.vessels.details(id).await?;
    Ok(success_response(details))
}

#[utoipa::path(
    get,
    path = "/api/v1/vessels/{id}/cargo",
    params(("id" = i32, Path, description = "Vessel ID")),
    responses(
        (status = 200, description = "Cargo assignments of the vessel", body = [CargoLine]),
        (status = 404, description = "Vessel not found", body = ErrorResponse)
    ),
    tag = "vessels"
)]
pub async fn list_cargo(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let cargo = state.services.vessels.cargo(id).await?;
    Ok(success_response(cargo))
}

#[utoipa::path(
    post,
    path = "/api/v1/vessels/{id}/cargo",
    params(("id" = i32, Path, description = "Vessel ID")),
    request_body = CargoInput,
    responses(
        (status = 201, description = "Cargo assignment added", body = cargo_assignment::Model),
        (status = 400, description = "Invalid client or product", body = ErrorResponse),
        (status = 404, description = "Vessel not found", body = ErrorResponse)
    ),
    tag = "vessels"
)]
pub async fn add_cargo(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<CargoInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let input = json_body(payload)?;
    let assignment = state.services.vessels.add_cargo(id, input).await?;
    Ok(created_response(assignment))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vessels/{id}/cargo/{assignment_id}",
    params(
        ("id" = i32, Path, description = "Vessel ID"),
        ("assignment_id" = i32, Path, description = "Cargo assignment ID")
    ),
    responses(
        (status = 204, description = "Cargo assignment removed"),
        (status = 404, description = "Cargo assignment not found", body = ErrorResponse)
    ),
    tag = "vessels"
)]
pub async fn remove_cargo(
    State(state): State<AppState>,
    ids: Result<Path<(i32, i32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let (vessel_id, assignment_id) = path_params(ids)?;
    state
        .services
        .vessels
        .remove_cargo(vessel_id, assignment_id)
        .await?;
    Ok(no_content_response())
}

pub fn vessel_routes() -> Router<AppState> {
    Router::new()
        .route("/vessels", get(list_vessels).post(create_vessel))
        .route("/vessels/month/:year/:month", get(list_vessels_by_month))
        .route("/vessels/results/:year/:month", get(vessel_results_by_month))
        .route(
            "/vessels/:id",
            get(get_vessel).put(update_vessel).delete(delete_vessel),
        )
        .route("/vessels/:id/result", get(vessel_result))
        .route("/vessels/:id/details", get(vessel_details))
        .route("/vessels/:id/cargo", get(list_cargo).post(add_cargo))
        .route(
            "/vessels/:id/cargo/:assignment_id",
            axum::routing::delete(remove_cargo),
        )
}
