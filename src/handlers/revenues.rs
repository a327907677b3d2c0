use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Response,
    routing::{get, post},
    Json, Router,
};

use super::common::{created_response, json_body, no_content_response, path_params, success_response};
use crate::entities::{revenue, revenue_category};
use crate::errors::{ApiError, ErrorResponse};
use crate::handlers::AppState;
use crate::services::reporting::dto::VesselLedgerTotal;
use crate::services::revenues::{RevenueInput, RevenueLine};

#[utoipa::path(
    get,
    path = "/api/v1/revenues/categories",
    responses((status = 200, description = "Revenue categories", body = [revenue_category::Model])),
    tag = "revenues"
)]
pub async fn list_revenue_categories(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(success_response(state.services.revenues.categories().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/revenues/vessel/{vessel_id}",
    params(("vessel_id" = i32, Path, description = "Vessel ID")),
    responses((status = 200, description = "Revenues of the vessel, oldest first", body = [RevenueLine])),
    tag = "revenues"
)]
pub async fn list_vessel_revenues(
    State(state): State<AppState>,
    vessel_id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let vessel_id = path_params(vessel_id)?;
    let revenues = state.services.revenues.list_by_vessel(vessel_id).await?;
    Ok(success_response(revenues))
}

#[utoipa::path(
    get,
    path = "/api/v1/revenues/vessel/{vessel_id}/total",
    params(("vessel_id" = i32, Path, description = "Vessel ID")),
    responses((status = 200, description = "Revenue total of the vessel", body = VesselLedgerTotal)),
    tag = "revenues"
)]
pub async fn vessel_revenue_total(
    State(state): State<AppState>,
    vessel_id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let vessel_id = path_params(vessel_id)?;
    let total = state.services.revenues.total_for_vessel(vessel_id).await?;
    Ok(success_response(total))
}

#[utoipa::path(
    get,
    path = "/api/v1/revenues/{id}",
    params(("id" = i32, Path, description = "Revenue ID")),
    responses(
        (status = 200, description = "Revenue fetched", body = revenue::Model),
        (status = 404, description = "Revenue not found", body = ErrorResponse)
    ),
    tag = "revenues"
)]
pub async fn get_revenue(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    Ok(success_response(state.services.revenues.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/revenues",
    request_body = RevenueInput,
    responses(
        (status = 201, description = "Revenue recorded", body = revenue::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "revenues"
)]
pub async fn create_revenue(
    State(state): State<AppState>,
    payload: Result<Json<RevenueInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let input = json_body(payload)?;
    let revenue = state.services.revenues.create(input).await?;
    Ok(created_response(revenue))
}

#[utoipa::path(
    put,
    path = "/api/v1/revenues/{id}",
    params(("id" = i32, Path, description = "Revenue ID")),
    request_body = RevenueInput,
    responses(
        (status = 200, description = "Revenue updated", body = revenue::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Revenue not found", body = ErrorResponse)
    ),
    tag = "revenues"
)]
pub async fn update_revenue(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<RevenueInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let input = json_body(payload)?;
    let revenue = state.services.revenues.update(id, input).await?;
    Ok(success_response(revenue))
}

#[utoipa::path(
    delete,
    path = "/api/v1/revenues/{id}",
    params(("id" = i32, Path, description = "Revenue ID")),
    responses(
        (status = 204, description = "Revenue deleted"),
        (status = 404, description = "Revenue not found", body = ErrorResponse)
    ),
    tag = "revenues"
)]
pub async fn delete_revenue(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    state.services.revenues.delete(id).await?;
    Ok(no_content_response())
}

pub fn revenue_routes() -> Router<AppState> {
    Router::new()
        .route("/revenues", post(create_revenue))
        .route("/revenues/categories", get(list_revenue_categories))
        .route("/revenues/vessel/:vessel_id", get(list_vessel_revenues))
        .route("/revenues/vessel/:vessel_id/total", get(vessel_revenue_total))
        .route(
            "/revenues/:id",
            get(get_revenue).put(update_revenue).delete(delete_revenue),
        )
}
