use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Response,
    routing::{get, post},
    Json, Router,
};

use super::common::{
    created_response, json_body, month_period, no_content_response, path_params,
    success_response, year_period,
};
use crate::entities::{charge_category, operating_charge};
use crate::errors::{ApiError, ErrorResponse};
use crate::handlers::AppState;
use crate::services::charges::{ChargeInput, ChargeLine, ChargeUpdate};
use crate::services::reporting::dto::{CategoryTotal, PeriodAmount};

#[utoipa::path(
    get,
    path = "/api/v1/charges/categories",
    responses((status = 200, description = "Operating charge categories", body = [charge_category::Model])),
    tag = "charges"
)]
pub async fn list_charge_categories(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(success_response(state.services.charges.categories().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/charges/month/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Charges booked for the month", body = [ChargeLine]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "charges"
)]
pub async fn list_month_charges(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = month_period(params)?;
    Ok(success_response(state.services.charges.list(period).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/charges/month/{year}/{month}/by-category",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Every charge category with its total for the month", body = [CategoryTotal]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "charges"
)]
pub async fn month_charges_by_category(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = month_period(params)?;
    let breakdown = state.services.aggregation.charge_breakdown(period).await?;
    Ok(success_response(breakdown))
}

#[utoipa::path(
    get,
    path = "/api/v1/charges/month/{year}/{month}/total",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Sum of the month's charges", body = PeriodAmount),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "charges"
)]
pub async fn month_charge_total(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = month_period(params)?;
    let total = state.services.aggregation.charge_total(period).await?;
    Ok(success_response(PeriodAmount {
        year: period.year,
        month: period.month,
        total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/charges/year/{year}",
    params(("year" = i32, Path, description = "Year")),
    responses(
        (status = 200, description = "Charges booked for the year", body = [ChargeLine]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "charges"
)]
pub async fn list_year_charges(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    Ok(success_response(state.services.charges.list(period).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/charges/{id}",
    params(("id" = i32, Path, description = "Operating charge ID")),
    responses(
        (status = 200, description = "Operating charge fetched", body = operating_charge::Model),
        (status = 404, description = "Operating charge not found", body = ErrorResponse)
    ),
    tag = "charges"
)]
pub async fn get_charge(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    Ok(success_response(state.services.charges.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/charges",
    request_body = ChargeInput,
    responses(
        (status = 201, description = "Operating charge recorded", body = operating_charge::Model),
        (status = 400, description = "Invalid request or charge already booked", body = ErrorResponse)
    ),
    tag = "charges"
)]
pub async fn create_charge(
    State(state): State<AppState>,
    payload: Result<Json<ChargeInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let input = json_body(payload)?;
    let charge = state.services.charges.create(input).await?;
    Ok(created_response(charge))
}

#[utoipa::path(
    post,
    path = "/api/v1/charges/upsert",
    request_body = ChargeInput,
    responses(
        (status = 200, description = "Operating charge inserted or overwritten", body = operating_charge::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "charges"
)]
pub async fn upsert_charge(
    State(state): State<AppState>,
    payload: Result<Json<ChargeInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let input = json_body(payload)?;
    let charge = state.services.charges.upsert(input).await?;
    Ok(success_response(charge))
}

#[utoipa::path(
    put,
    path = "/api/v1/charges/{id}",
    params(("id" = i32, Path, description = "Operating charge ID")),
    request_body = ChargeUpdate,
    responses(
        (status = 200, description = "Operating charge updated", body = operating_charge::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Operating charge not found", body = ErrorResponse)
    ),
    tag = "charges"
)]
pub async fn update_charge(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ChargeUpdate>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let input = json_body(payload)?;
    let charge = state.services.charges.update(id, input).await?;
    Ok(success_response(charge))
}

#[utoipa::path(
    delete,
    path = "/api/v1/charges/{id}",
    params(("id" = i32, Path, description = "Operating charge ID")),
    responses(
        (status = 204, description = "Operating charge deleted"),
        (status = 404, description = "Operating charge not found", body = ErrorResponse)
    ),
    tag = "charges"
)]
pub async fn delete_charge(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    state.services.charges.delete(id).await?;
    Ok(no_content_response())
}

pub fn charge_routes() -> Router<AppState> {
    Router::new()
        .route("/charges", post(create_charge))
        .route("/charges/upsert", post(upsert_charge))
        .route("/charges/categories", get(list_charge_categories))
        .route("/charges/month/:year/:month", get(list_month_charges))
        .route(
            "/charges/month/:year/:month/by-category",
            get(month_charges_by_category),
        )
        .route("/charges/month/:year/:month/total", get(month_charge_total))
        .route("/charges/year/:year", get(list_year_charges))
        .route(
            "/charges/:id",
            get(get_charge).put(update_charge).delete(delete_charge),
        )
}
