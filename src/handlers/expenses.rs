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
use crate::entities::{expense, expense_category};
use crate::errors::{ApiError, ErrorResponse};
use crate::handlers::AppState;
use crate::services::reporting::dto::{CategoryTotal, VesselLedgerTotal};
use crate::services::expenses::{ExpenseInput, ExpenseLine};

#[utoipa::path(
    get,
    path = "/api/v1/expenses/categories",
    responses((status = 200, description = "Expense categories", body = [expense_category::Model])),
    tag = "expenses"
)]
pub async fn list_expense_categories(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(success_response(state.services.expenses.categories().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/expenses/vessel/{vessel_id}",
    params(("vessel_id" = i32, Path, description = "Vessel ID")),
    responses((status = 200, description = "Expenses of the vessel, oldest first", body = [ExpenseLine])),
    tag = "expenses"
)]
pub async fn list_vessel_expenses(
    State(state): State<AppState>,
    vessel_id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let vessel_id = path_params(vessel_id)?;
    let expenses = state.services.expenses.list_by_vessel(vessel_id).await?;
    Ok(success_response(expenses))
}

#[utoipa::path(
    get,
    path = "/api/v1/expenses/vessel/{vessel_id}/total",
    params(("vessel_id" = i32, Path, description = "Vessel ID")),
    responses((status = 200, description = "Expense total of the vessel", body = VesselLedgerTotal)),
    tag = "expenses"
)]
pub async fn vessel_expense_total(
    State(state): State<AppState>,
    vessel_id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let vessel_id = path_params(vessel_id)?;
    let total = state.services.expenses.total_for_vessel(vessel_id).await?;
    Ok(success_response(total))
}

#[utoipa::path(
    get,
    path = "/api/v1/expenses/vessel/{vessel_id}/by-category",
    params(("vessel_id" = i32, Path, description = "Vessel ID")),
    responses((status = 200, description = "Expenses of the vessel grouped by category", body = [CategoryTotal])),
    tag = "expenses"
)]
pub async fn vessel_expenses_by_category(
    State(state): State<AppState>,
    vessel_id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let vessel_id = path_params(vessel_id)?;
    let breakdown = state
        .services
        .aggregation
        .vessel_expense_breakdown(vessel_id)
        .await?;
    Ok(success_response(breakdown))
}

#[utoipa::path(
    get,
    path = "/api/v1/expenses/{id}",
    params(("id" = i32, Path, description = "Expense ID")),
    responses(
        (status = 200, description = "Expense fetched", body = expense::Model),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    ),
    tag = "expenses"
)]
pub async fn get_expense(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    Ok(success_response(state.services.expenses.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    request_body = ExpenseInput,
    responses(
        (status = 201, description = "Expense recorded", body = expense::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "expenses"
)]
pub async fn create_expense(
    State(state): State<AppState>,
    payload: Result<Json<ExpenseInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let input = json_body(payload)?;
    let expense = state.services.expenses.create(input).await?;
    Ok(created_response(expense))
}

#[utoipa::path(
    put,
    path = "/api/v1/expenses/{id}",
    params(("id" = i32, Path, description = "Expense ID")),
    request_body = ExpenseInput,
    responses(
        (status = 200, description = "Expense updated", body = expense::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    ),
    tag = "expenses"
)]
pub async fn update_expense(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ExpenseInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let input = json_body(payload)?;
    let expense = state.services.expenses.update(id, input).await?;
    Ok(success_response(expense))
}

#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{id}",
    params(("id" = i32, Path, description = "Expense ID")),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    ),
    tag = "expenses"
)]
pub async fn delete_expense(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    state.services.expenses.delete(id).await?;
    Ok(no_content_response())
}

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route("/expenses/categories", get(list_expense_categories))
        .route("/expenses/vessel/:vessel_id", get(list_vessel_expenses))
        .route("/expenses/vessel/:vessel_id/total", get(vessel_expense_total))
        .route(
            "/expenses/vessel/:vessel_id/by-category",
            get(vessel_expenses_by_category),
        )
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}
