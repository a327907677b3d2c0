use axum::{extract::State, response::Response, routing::get, Router};

use super::common::success_response;
use crate::config::CompanyConfig;
use crate::errors::ApiError;
use crate::handlers::AppState;

/// Company profile used on exported reports. Changed through configuration only.
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses((status = 200, description = "Company profile", body = CompanyConfig)),
    tag = "settings"
)]
pub async fn get_settings(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(success_response(&state.config.company))
}

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings))
}
