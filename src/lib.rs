//! Shipping Ledger
//!
//! Financial tracking for a shipping agency: vessel calls, cargo, revenues,
//! expenses and operating charges, with monthly and annual reporting.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod openapi;
pub mod reports;
pub mod services;
pub mod tracing;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

/// Every resource route, to be nested under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(handlers::vessels::vessel_routes())
        .merge(handlers::clients::client_routes())
        .merge(handlers::products::product_routes())
        .merge(handlers::revenues::revenue_routes())
        .merge(handlers::expenses::expense_routes())
        .merge(handlers::charges::charge_routes())
        .merge(handlers::reports::report_routes())
        .merge(handlers::exports::export_routes())
        .merge(handlers::settings::settings_routes())
}

/// Complete application router: `/health`, the v1 API and Swagger UI, with
/// request ids and HTTP tracing. Transport layers (CORS, compression) are
/// added by the binary.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::health::health_routes())
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
