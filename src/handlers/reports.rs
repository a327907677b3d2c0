use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Response,
    routing::get,
    Router,
};

use super::common::{month_period, success_response, year_period, TopQuery};
use crate::errors::{ApiError, ErrorResponse};
use crate::handlers::AppState;
use crate::services::reporting::dto::{
    AnnualReport, AnnualVesselLine, CategoryBreakdown, ClientRanking, MonthlySummary,
    PeriodTotals, ProductRanking, VesselDetail, VesselResult,
};

fn top_limit(query: Result<Query<TopQuery>, QueryRejection>) -> Result<usize, ApiError> {
    let Query(query) = query?;
    Ok(query.limit())
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/monthly/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Totals of the month", body = PeriodTotals),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn monthly_totals(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = month_period(params)?;
    let totals = state.services.aggregation.period_totals(period).await?;
    Ok(success_response(totals))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/monthly/{year}/{month}/vessels",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Detail block of every vessel arriving in the month", body = [VesselDetail]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn monthly_vessels(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = month_period(params)?;
    let details = state.services.aggregation.vessel_details(period).await?;
    Ok(success_response(details))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/monthly/{year}/{month}/categories",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Revenue, expense and charge totals per category", body = CategoryBreakdown),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn monthly_categories(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = month_period(params)?;
    let breakdown = state.services.aggregation.category_breakdown(period).await?;
    Ok(success_response(breakdown))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/annual/{year}",
    params(("year" = i32, Path, description = "Year")),
    responses(
        (status = 200, description = "Totals of the year", body = PeriodTotals),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn annual_totals(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    let totals = state.services.aggregation.period_totals(period).await?;
    Ok(success_response(totals))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/annual/{year}/summary",
    params(("year" = i32, Path, description = "Year")),
    responses(
        (status = 200, description = "Months of the year with at least one vessel call", body = [MonthlySummary]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn annual_summary(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    let summary = state.services.aggregation.annual_summary(period.year).await?;
    Ok(success_response(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/annual/{year}/evolution",
    params(("year" = i32, Path, description = "Year")),
    responses(
        (status = 200, description = "Twelve monthly totals, January to December", body = [MonthlySummary]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn annual_evolution(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    let series = state.services.aggregation.monthly_series(period.year).await?;
    Ok(success_response(series))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/annual/{year}/categories",
    params(("year" = i32, Path, description = "Year")),
    responses(
        (status = 200, description = "Category totals for the year", body = CategoryBreakdown),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn annual_categories(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    let breakdown = state.services.aggregation.category_breakdown(period).await?;
    Ok(success_response(breakdown))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/annual/{year}/complete",
    params(("year" = i32, Path, description = "Year")),
    responses(
        (status = 200, description = "Full annual report", body = AnnualReport),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn annual_complete(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    let report = state.services.aggregation.annual_report(period.year).await?;
    Ok(success_response(report))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/annual/{year}/vessels",
    params(("year" = i32, Path, description = "Year")),
    responses(
        (status = 200, description = "Every vessel of the year with its result", body = [AnnualVesselLine]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn annual_vessels(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    let vessels = state.services.aggregation.annual_vessels(period.year).await?;
    Ok(success_response(vessels))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/annual/{year}/vessels/top",
    params(("year" = i32, Path, description = "Year"), TopQuery),
    responses(
        (status = 200, description = "Vessels by net result, best first", body = [VesselResult]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn annual_top_vessels(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    let limit = top_limit(query)?;
    let vessels = state.services.aggregation.top_vessels(period, limit).await?;
    Ok(success_response(vessels))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/annual/{year}/clients/top",
    params(("year" = i32, Path, description = "Year"), TopQuery),
    responses(
        (status = 200, description = "Clients by vessel count then tonnage", body = [ClientRanking]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn annual_top_clients(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    let limit = top_limit(query)?;
    let clients = state.services.aggregation.top_clients(period, limit).await?;
    Ok(success_response(clients))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/annual/{year}/products/top",
    params(("year" = i32, Path, description = "Year"), TopQuery),
    responses(
        (status = 200, description = "Products by tonnage then vessel count", body = [ProductRanking]),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn annual_top_products(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    let limit = top_limit(query)?;
    let products = state.services.aggregation.top_products(period, limit).await?;
    Ok(success_response(products))
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/monthly/:year/:month", get(monthly_totals))
        .route("/reports/monthly/:year/:month/vessels", get(monthly_vessels))
        .route(
            "/reports/monthly/:year/:month/categories",
            get(monthly_categories),
        )
        .route("/reports/annual/:year", get(annual_totals))
        .route("/reports/annual/:year/summary", get(annual_summary))
        .route("/reports/annual/:year/evolution", get(annual_evolution))
        .route("/reports/annual/:year/categories", get(annual_categories))
        .route("/reports/annual/:year/complete", get(annual_complete))
        .route("/reports/annual/:year/vessels", get(annual_vessels))
        .route("/reports/annual/:year/vessels/top", get(annual_top_vessels))
        .route("/reports/annual/:year/clients/top", get(annual_top_clients))
        .route("/reports/annual/:year/products/top", get(annual_top_products))
}
