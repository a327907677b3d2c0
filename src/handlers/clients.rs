use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Response,
    routing::get,
    Json, Router,
};

use super::common::{created_response, json_body, no_content_response, path_params, success_response};
use crate::entities::{client, vessel};
use crate::errors::{ApiError, ErrorResponse};
use crate::handlers::AppState;
use crate::services::clients::ClientInput;

#[utoipa::path(
    get,
    path = "/api/v1/clients",
    responses((status = 200, description = "Clients by name", body = [client::Model])),
    tag = "clients"
)]
pub async fn list_clients(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(success_response(state.services.clients.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client fetched", body = client::Model),
        (status = 404, description = "Client not found", body = ErrorResponse)
    ),
    tag = "clients"
)]
pub async fn get_client(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    Ok(success_response(state.services.clients.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/clients",
    request_body = ClientInput,
    responses(
        (status = 201, description = "Client created", body = client::Model),
        (status = 400, description = "Invalid request or duplicate code", body = ErrorResponse)
    ),
    tag = "clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    payload: Result<Json<ClientInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let input = json_body(payload)?;
    let client = state.services.clients.create(input).await?;
    Ok(created_response(client))
}

#[utoipa::path(
    put,
    path = "/api/v1/clients/{id}",
    params(("id" = i32, Path, description = "Client ID")),
    request_body = ClientInput,
    responses(
        (status = 200, description = "Client updated", body = client::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Client not found", body = ErrorResponse)
    ),
    tag = "clients"
)]
pub async fn update_client(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ClientInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let input = json_body(payload)?;
    let client = state.services.clients.update(id, input).await?;
    Ok(success_response(client))
}

#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 409, description = "Client still has cargo assignments", body = ErrorResponse)
    ),
    tag = "clients"
)]
pub async fn delete_client(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    state.services.clients.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/vessels",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Vessels that carried cargo for the client", body = [vessel::Model]),
        (status = 404, description = "Client not found", body = ErrorResponse)
    ),
    tag = "clients"
)]
pub async fn client_vessels(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    Ok(success_response(state.services.clients.vessels(id).await?))
}

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/clients/:id/vessels", get(client_vessels))
}
