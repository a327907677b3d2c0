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
use crate::entities::{product, vessel};
use crate::errors::{ApiError, ErrorResponse};
use crate::handlers::AppState;
use crate::services::products::ProductInput;

#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses((status = 200, description = "Products by name", body = [product::Model])),
    tag = "products"
)]
pub async fn list_products(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(success_response(state.services.products.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product fetched", body = product::Model),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    Ok(success_response(state.services.products.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = product::Model),
        (status = 400, description = "Invalid request or duplicate code", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let input = json_body(payload)?;
    let product = state.services.products.create(input).await?;
    Ok(created_response(product))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = product::Model),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    let input = json_body(payload)?;
    let product = state.services.products.update(id, input).await?;
    Ok(success_response(product))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Product still has cargo assignments", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    state.services.products.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/vessels",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Vessels that carried the product", body = [vessel::Model]),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn product_vessels(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_params(id)?;
    Ok(success_response(state.services.products.vessels(id).await?))
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/:id/vessels", get(product_vessels))
}
