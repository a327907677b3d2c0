#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shipping_ledger::{app_router, config::AppConfig, db, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

/// Seeded category ids
pub const CONSIGNATION: i32 = 1;
pub const MANUTENTION: i32 = 3;
pub const DROITS_DE_PORT: i32 = 1;
pub const PILOTAGE: i32 = 2;
pub const SALAIRES: i32 = 1;
pub const LOYER: i32 = 2;

/// Application router backed by a fresh, migrated SQLite file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("ledger_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            5000,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone());

        Self {
            router,
            state,
            _dir: dir,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.request(Method::DELETE, uri, None).await
    }

    /// GET that must succeed; returns the JSON body.
    pub async fn get_json(&self, uri: &str) -> Value {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        body_json(response).await
    }

    pub async fn create_vessel(&self, name: &str, arrival: &str) -> i64 {
        let response = self
            .post(
                "/api/v1/vessels",
                json!({ "name": name, "arrival_date": arrival }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_i64().expect("vessel id")
    }

    pub async fn add_revenue(&self, vessel_id: i64, category_id: i32, amount: &str, date: &str) -> i64 {
        let response = self
            .post(
                "/api/v1/revenues",
                json!({
                    "vessel_id": vessel_id,
                    "category_id": category_id,
                    "amount": amount,
                    "revenue_date": date,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_i64().expect("revenue id")
    }

    pub async fn add_expense(&self, vessel_id: i64, category_id: i32, amount: &str, date: &str) -> i64 {
        let response = self
            .post(
                "/api/v1/expenses",
                json!({
                    "vessel_id": vessel_id,
                    "category_id": category_id,
                    "amount": amount,
                    "expense_date": date,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_i64().expect("expense id")
    }

    pub async fn add_charge(&self, category_id: i32, amount: &str, year: i32, month: u32) -> i64 {
        let response = self
            .post(
                "/api/v1/charges",
                json!({
                    "category_id": category_id,
                    "amount": amount,
                    "year": year,
                    "month": month,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_i64().expect("charge id")
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is json")
}

/// Decimal fields serialize as strings; compare them numerically.
pub fn amount(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.as_f64().expect("number"),
        other => panic!("not an amount: {other}"),
    }
}

/// Exact decimal value of a serialized amount.
pub fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal serialized as string")
        .parse()
        .expect("decimal string")
}
