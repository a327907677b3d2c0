mod common;

use axum::http::{header, StatusCode};
use common::{body_bytes, body_json, TestApp, CONSIGNATION, PILOTAGE, SALAIRES};

const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

async fn seeded_app() -> TestApp {
    let app = TestApp::new().await;
    let vessel = app.create_vessel("MV Atlantic", "2024-03-05").await;
    app.add_revenue(vessel, CONSIGNATION, "500000", "2024-03-06").await;
    app.add_expense(vessel, PILOTAGE, "200000", "2024-03-07").await;
    app.add_charge(SALAIRES, "50000", 2024, 3).await;
    app
}

fn header_str<'a>(response: &'a axum::response::Response, name: header::HeaderName) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn monthly_workbook_download() {
    let app = seeded_app().await;

    let response = app.get("/api/v1/reports/export/monthly/2024/3/xlsx").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_TYPE), XLSX);
    assert_eq!(
        header_str(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"rapport_its_2024_3.xlsx\""
    );

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn monthly_pdf_download() {
    let app = seeded_app().await;

    let response = app.get("/api/v1/reports/export/monthly/2024/3/pdf").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_TYPE), "application/pdf");
    assert_eq!(
        header_str(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"rapport_its_2024_3.pdf\""
    );

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn annual_workbook_download() {
    let app = seeded_app().await;

    let response = app.get("/api/v1/reports/export/annual/2024/xlsx").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_TYPE), XLSX);
    assert_eq!(
        header_str(&response, header::CONTENT_DISPOSITION),
        "attachment; filename=\"rapport_annuel_its_2024.xlsx\""
    );
    assert!(body_bytes(response).await.starts_with(b"PK"));
}

#[tokio::test]
async fn empty_periods_still_render() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/reports/export/monthly/2025/1/pdf").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.starts_with(b"%PDF"));

    let response = app.get("/api/v1/reports/export/annual/2025/xlsx").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_export_period() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/reports/export/monthly/2024/13/xlsx").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}
