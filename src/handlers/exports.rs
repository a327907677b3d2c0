use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Response,
    routing::get,
    Router,
};
use chrono::Utc;
use tracing::info;

use super::common::{attachment_response, month_period, year_period};
use crate::errors::{ApiError, ErrorResponse, ServiceError};
use crate::handlers::AppState;
use crate::reports::{self, RenderContext, RenderError};

fn render_context(state: &AppState) -> RenderContext {
    RenderContext::new(&state.config.company, Utc::now().date_naive())
}

/// Runs a renderer on the blocking pool.
async fn render<F>(job: F) -> Result<Vec<u8>, ServiceError>
where
    F: FnOnce() -> Result<Vec<u8>, RenderError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ServiceError::InternalError(format!("Render task failed: {e}")))?
        .map_err(ServiceError::from)
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/export/monthly/{year}/{month}/xlsx",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Monthly cross-tab workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "exports"
)]
pub async fn export_monthly_xlsx(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = month_period(params)?;
    let month = period.month.unwrap_or_default();
    let report = state.services.aggregation.monthly_report(period).await?;
    let ctx = render_context(&state);

    let bytes = render(move || reports::render_monthly_xlsx(&report, &ctx)).await?;
    info!(year = period.year, month, size = bytes.len(), "Monthly workbook exported");
    Ok(attachment_response(
        bytes,
        reports::XLSX_CONTENT_TYPE,
        &reports::monthly_xlsx_filename(period.year, month),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/export/monthly/{year}/{month}/pdf",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Monthly report document", content_type = "application/pdf"),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "exports"
)]
pub async fn export_monthly_pdf(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = month_period(params)?;
    let month = period.month.unwrap_or_default();
    let report = state.services.aggregation.monthly_report(period).await?;
    let ctx = render_context(&state);

    let bytes = render(move || reports::render_monthly_pdf(&report, &ctx)).await?;
    info!(year = period.year, month, size = bytes.len(), "Monthly document exported");
    Ok(attachment_response(
        bytes,
        reports::PDF_CONTENT_TYPE,
        &reports::monthly_pdf_filename(period.year, month),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/export/annual/{year}/xlsx",
    params(("year" = i32, Path, description = "Year")),
    responses(
        (status = 200, description = "Six-sheet annual workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Malformed period", body = ErrorResponse)
    ),
    tag = "exports"
)]
pub async fn export_annual_xlsx(
    State(state): State<AppState>,
    params: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let period = year_period(params)?;
    let report = state.services.aggregation.annual_report(period.year).await?;
    let ctx = render_context(&state);

    let bytes = render(move || reports::render_annual_xlsx(&report, &ctx)).await?;
    info!(year = period.year, size = bytes.len(), "Annual workbook exported");
    Ok(attachment_response(
        bytes,
        reports::XLSX_CONTENT_TYPE,
        &reports::annual_xlsx_filename(period.year),
    ))
}

pub fn export_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reports/export/monthly/:year/:month/xlsx",
            get(export_monthly_xlsx),
        )
        .route(
            "/reports/export/monthly/:year/:month/pdf",
            get(export_monthly_pdf),
        )
        .route("/reports/export/annual/:year/xlsx", get(export_annual_xlsx))
}
