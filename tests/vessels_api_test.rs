mod common;

use axum::http::StatusCode;
use common::{amount, body_json, TestApp, CONSIGNATION, PILOTAGE};
use serde_json::json;

#[tokio::test]
async fn vessel_crud_round_trip() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/api/v1/vessels",
            json!({
                "name": "MV Atlantic",
                "imo_number": "IMO9321483",
                "arrival_date": "2024-03-05",
                "departure_date": "2024-03-09",
                "total_tonnage": "12500"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().contains_key("x-request-id"));
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["status"], "in_progress");

    let fetched = app.get_json(&format!("/api/v1/vessels/{id}")).await;
    assert_eq!(fetched["name"], "MV Atlantic");
    assert_eq!(fetched["imo_number"], "IMO9321483");

    let response = app
        .put(
            &format!("/api/v1/vessels/{id}"),
            json!({
                "name": "MV Atlantic II",
                "arrival_date": "2024-03-05",
                "status": "completed"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "MV Atlantic II");
    assert_eq!(updated["status"], "completed");
    assert!(updated["imo_number"].is_null());

    let listed = app.get_json("/api/v1/vessels").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let march = app.get_json("/api/v1/vessels/month/2024/3").await;
    assert_eq!(march.as_array().unwrap().len(), 1);
    let april = app.get_json("/api/v1/vessels/month/2024/4").await;
    assert!(april.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_vessel_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/vessels/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Vessel 999 not found");

    let response = app.delete("/api/v1/vessels/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_vessel_payloads_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/v1/vessels", json!({ "name": "", "arrival_date": "2024-03-05" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());

    let response = app.post("/api/v1/vessels", json!({ "name": "MV Gulf" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());

    let response = app
        .post(
            "/api/v1/vessels",
            json!({
                "name": "MV Gulf",
                "arrival_date": "2024-03-05",
                "departure_date": "2024-03-01"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post(
            "/api/v1/vessels",
            json!({ "name": "   ", "arrival_date": "2024-03-05" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Vessel name is required");

    let response = app
        .post(
            "/api/v1/vessels",
            json!({ "name": "MV Gulf", "arrival_date": "2024-03-05", "total_tonnage": "12500.125" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.get_json("/api/v1/vessels").await.as_array().unwrap().is_empty());

    let response = app.get("/api/v1/vessels/month/2024/13").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = app.get("/api/v1/vessels/month/2024/march").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn vessel_with_ledger_rows_cannot_be_deleted() {
    let app = TestApp::new().await;
    let vessel = app.create_vessel("MV Atlantic", "2024-03-05").await;
    let revenue = app
        .add_revenue(vessel, CONSIGNATION, "500000", "2024-03-06")
        .await;

    let response = app.delete(&format!("/api/v1/vessels/{vessel}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("revenue"));

    // Still there
    app.get_json(&format!("/api/v1/vessels/{vessel}")).await;

    let response = app.delete(&format!("/api/v1/revenues/{revenue}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = app.delete(&format!("/api/v1/vessels/{vessel}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn deleting_vessel_removes_its_cargo() {
    let app = TestApp::new().await;
    let vessel = app.create_vessel("MV Gulf", "2024-03-18").await;

    let response = app
        .post(
            &format!("/api/v1/vessels/{vessel}/cargo"),
            json!({ "client_name": "Ciments du Sahel", "product_name": "Clinker", "tonnage": "3000" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let client_id = body_json(response).await["client_id"].as_i64().unwrap();

    let response = app.delete(&format!("/api/v1/vessels/{vessel}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(&format!("/api/v1/vessels/{vessel}/cargo")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The client has no cargo left and can now be deleted
    let response = app.delete(&format!("/api/v1/clients/{client_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn cargo_by_name_creates_and_reuses_parties() {
    let app = TestApp::new().await;
    let first = app.create_vessel("MV Atlantic", "2024-03-05").await;
    let second = app.create_vessel("MV Gulf", "2024-03-18").await;

    let response = app
        .post(
            &format!("/api/v1/vessels/{first}/cargo"),
            json!({ "client_name": "Ciments du Sahel", "product_name": "Clinker", "tonnage": "3000" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let clients = app.get_json("/api/v1/clients").await;
    let clients = clients.as_array().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0]["code"], "CIMENTS_DU_SAHEL");
    let client_id = clients[0]["id"].as_i64().unwrap();

    let response = app
        .post(
            &format!("/api/v1/vessels/{second}/cargo"),
            json!({ "client_id": client_id, "product_name": "Clinker", "tonnage": "1500" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(app.get_json("/api/v1/clients").await.as_array().unwrap().len(), 1);
    assert_eq!(app.get_json("/api/v1/products").await.as_array().unwrap().len(), 1);

    let cargo = app.get_json(&format!("/api/v1/vessels/{second}/cargo")).await;
    assert_eq!(cargo[0]["client_name"], "Ciments du Sahel");
    assert_eq!(cargo[0]["product_name"], "Clinker");
    assert_eq!(amount(&cargo[0]["tonnage"]), 1500.0);

    let vessels = app
        .get_json(&format!("/api/v1/clients/{client_id}/vessels"))
        .await;
    assert_eq!(vessels.as_array().unwrap().len(), 2);

    let response = app
        .post(
            &format!("/api/v1/vessels/{first}/cargo"),
            json!({ "client_id": 999, "product_name": "Clinker" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.delete(&format!("/api/v1/clients/{client_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn vessel_result_and_details() {
    let app = TestApp::new().await;
    let vessel = app.create_vessel("MV Atlantic", "2024-03-05").await;
    app.add_revenue(vessel, CONSIGNATION, "500000", "2024-03-06").await;
    app.add_expense(vessel, PILOTAGE, "200000", "2024-03-07").await;

    let result = app.get_json(&format!("/api/v1/vessels/{vessel}/result")).await;
    assert_eq!(amount(&result["total_revenue"]), 500000.0);
    assert_eq!(amount(&result["total_expense"]), 200000.0);
    assert_eq!(amount(&result["net_result"]), 300000.0);

    let unknown = app.get_json("/api/v1/vessels/424242/result").await;
    assert_eq!(amount(&unknown["total_revenue"]), 0.0);
    assert_eq!(amount(&unknown["net_result"]), 0.0);

    let details = app.get_json(&format!("/api/v1/vessels/{vessel}/details")).await;
    assert_eq!(details["name"], "MV Atlantic");
    assert_eq!(details["revenues"].as_array().unwrap().len(), 1);
    assert_eq!(details["expenses"][0]["category"], "Pilotage");

    let results = app.get_json("/api/v1/vessels/results/2024/3").await;
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(amount(&results[0]["net_result"]), 300000.0);
}
