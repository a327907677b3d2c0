mod common;

use axum::http::StatusCode;
use common::{amount, body_json, TestApp, CONSIGNATION, MANUTENTION, PILOTAGE, SALAIRES};
use serde_json::{json, Value};

/// One vessel in March 2024 with a 500 000 revenue, a 200 000 expense and a
/// 50 000 salaries charge.
async fn march_scenario(app: &TestApp) -> i64 {
    let vessel = app.create_vessel("MV Atlantic", "2024-03-05").await;
    app.add_revenue(vessel, CONSIGNATION, "500000", "2024-03-06").await;
    app.add_expense(vessel, PILOTAGE, "200000", "2024-03-07").await;
    app.add_charge(SALAIRES, "50000", 2024, 3).await;
    vessel
}

fn assert_totals(totals: &Value, expected: [f64; 6]) {
    assert_eq!(totals["vessel_count"].as_f64().unwrap(), expected[0]);
    assert_eq!(amount(&totals["total_revenue"]), expected[1]);
    assert_eq!(amount(&totals["total_expense"]), expected[2]);
    assert_eq!(amount(&totals["net_vessel_result"]), expected[3]);
    assert_eq!(amount(&totals["operating_charges"]), expected[4]);
    assert_eq!(amount(&totals["global_result"]), expected[5]);
}

#[tokio::test]
async fn monthly_totals_for_single_vessel() {
    let app = TestApp::new().await;
    march_scenario(&app).await;

    let totals = app.get_json("/api/v1/reports/monthly/2024/3").await;
    assert_eq!(totals["year"], 2024);
    assert_eq!(totals["month"], 3);
    assert_totals(&totals, [1.0, 500000.0, 200000.0, 300000.0, 50000.0, 250000.0]);

    let april = app.get_json("/api/v1/reports/monthly/2024/4").await;
    assert_totals(&april, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
}

#[tokio::test]
async fn charges_count_without_vessels() {
    let app = TestApp::new().await;
    app.add_charge(SALAIRES, "50000", 2024, 5).await;

    let totals = app.get_json("/api/v1/reports/monthly/2024/5").await;
    assert_totals(&totals, [0.0, 0.0, 0.0, 0.0, 50000.0, -50000.0]);
}

#[tokio::test]
async fn monthly_vessels_and_categories() {
    let app = TestApp::new().await;
    let vessel = march_scenario(&app).await;
    app.add_revenue(vessel, MANUTENTION, "120000", "2024-03-08").await;
    let response = app
        .post(
            &format!("/api/v1/vessels/{vessel}/cargo"),
            json!({ "client_name": "Ciments du Sahel", "product_name": "Clinker", "tonnage": "3000" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let vessels = app.get_json("/api/v1/reports/monthly/2024/3/vessels").await;
    let vessels = vessels.as_array().unwrap();
    assert_eq!(vessels.len(), 1);
    assert_eq!(vessels[0]["name"], "MV Atlantic");
    assert_eq!(vessels[0]["clients"][0], "Ciments du Sahel");
    assert_eq!(amount(&vessels[0]["net_result"]), 420000.0);
    assert_eq!(vessels[0]["revenues"].as_array().unwrap().len(), 2);

    let categories = app
        .get_json("/api/v1/reports/monthly/2024/3/categories")
        .await;
    let revenues = categories["revenues"].as_array().unwrap();
    assert_eq!(revenues.len(), 2);
    assert_eq!(revenues[0]["name"], "Consignation");
    assert_eq!(amount(&revenues[0]["total"]), 500000.0);
    assert_eq!(revenues[1]["name"], "Manutention");
    assert_eq!(categories["expenses"][0]["name"], "Pilotage");
    // Month scope lists every charge category
    assert_eq!(categories["charges"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn annual_rollups_agree_with_months() {
    let app = TestApp::new().await;
    march_scenario(&app).await;
    let june = app.create_vessel("MV Gulf", "2024-06-12").await;
    app.add_revenue(june, CONSIGNATION, "300000", "2024-06-13").await;
    app.add_expense(june, PILOTAGE, "100000", "2024-06-14").await;
    app.add_charge(SALAIRES, "50000", 2024, 6).await;
    // Other years stay out
    let other = app.create_vessel("MV Old", "2023-12-30").await;
    app.add_revenue(other, CONSIGNATION, "999", "2024-01-02").await;

    let evolution = app.get_json("/api/v1/reports/annual/2024/evolution").await;
    let evolution = evolution.as_array().unwrap();
    assert_eq!(evolution.len(), 12);
    assert_eq!(evolution[0]["month_name"], "Janvier");
    assert_eq!(evolution[2]["month_name"], "Mars");
    assert_eq!(amount(&evolution[0]["total_revenue"]), 0.0);

    let annual = app.get_json("/api/v1/reports/annual/2024").await;
    assert_totals(&annual, [2.0, 800000.0, 300000.0, 500000.0, 100000.0, 400000.0]);
    let summed: f64 = evolution.iter().map(|m| amount(&m["global_result"])).sum();
    assert_eq!(summed, amount(&annual["global_result"]));

    let summary = app.get_json("/api/v1/reports/annual/2024/summary").await;
    let months: Vec<u64> = summary
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["month"].as_u64().unwrap())
        .collect();
    assert_eq!(months, vec![3, 6]);

    let categories = app.get_json("/api/v1/reports/annual/2024/categories").await;
    assert_eq!(amount(&categories["revenues"][0]["total"]), 800000.0);
    assert_eq!(categories["charges"].as_array().unwrap().len(), 1);

    let vessels = app.get_json("/api/v1/reports/annual/2024/vessels").await;
    let vessels = vessels.as_array().unwrap();
    assert_eq!(vessels.len(), 2);
    assert_eq!(vessels[0]["month_name"], "Mars");
    assert_eq!(vessels[1]["month"], 6);

    let complete = app.get_json("/api/v1/reports/annual/2024/complete").await;
    assert_eq!(complete["year"], 2024);
    assert_eq!(complete["evolution"].as_array().unwrap().len(), 12);
    assert_eq!(complete["summary"].as_array().unwrap().len(), 2);
    assert_eq!(amount(&complete["totals"]["global_result"]), 400000.0);
    assert_eq!(complete["top_vessels"][0]["name"], "MV Atlantic");
}

#[tokio::test]
async fn top_vessels_keep_negative_results() {
    let app = TestApp::new().await;
    let nets = [
        ("MV Delta", "-20000000"),
        ("MV Alpha", "170000000"),
        ("MV Gamma", "140000000"),
        ("MV Beta", "150000000"),
    ];
    for (i, (name, net)) in nets.iter().enumerate() {
        let vessel = app
            .create_vessel(name, &format!("2024-0{}-10", i + 1))
            .await;
        if net.starts_with('-') {
            app.add_expense(vessel, PILOTAGE, &net[1..], "2024-01-11").await;
        } else {
            app.add_revenue(vessel, CONSIGNATION, net, "2024-01-11").await;
        }
    }

    let top = app.get_json("/api/v1/reports/annual/2024/vessels/top").await;
    let results: Vec<f64> = top
        .as_array()
        .unwrap()
        .iter()
        .map(|v| amount(&v["net_result"]))
        .collect();
    assert_eq!(results, vec![170e6, 150e6, 140e6, -20e6]);

    let top = app
        .get_json("/api/v1/reports/annual/2024/vessels/top?limit=2")
        .await;
    assert_eq!(top.as_array().unwrap().len(), 2);
    assert_eq!(top[1]["name"], "MV Beta");
}

#[tokio::test]
async fn top_clients_and_products() {
    let app = TestApp::new().await;
    let cargo = [
        ("MV Alpha", "2024-02-01", "Sahel Trading", "Clinker", "1000"),
        ("MV Beta", "2024-03-01", "Sahel Trading", "Riz", "500"),
        ("MV Gamma", "2024-04-01", "Port Négoce", "Clinker", "8000"),
    ];
    for (vessel, arrival, client, product, tonnage) in cargo {
        let id = app.create_vessel(vessel, arrival).await;
        let response = app
            .post(
                &format!("/api/v1/vessels/{id}/cargo"),
                json!({ "client_name": client, "product_name": product, "tonnage": tonnage }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let clients = app.get_json("/api/v1/reports/annual/2024/clients/top").await;
    assert_eq!(clients[0]["name"], "Sahel Trading");
    assert_eq!(clients[0]["rank"], 1);
    assert_eq!(clients[0]["vessel_count"], 2);
    assert_eq!(clients[1]["name"], "Port Négoce");

    let products = app.get_json("/api/v1/reports/annual/2024/products/top").await;
    assert_eq!(products[0]["name"], "Clinker");
    assert_eq!(amount(&products[0]["tonnage"]), 9000.0);
    assert_eq!(products[0]["client_count"], 2);
    assert_eq!(products[1]["name"], "Riz");
}

#[tokio::test]
async fn malformed_report_requests() {
    let app = TestApp::new().await;

    for uri in [
        "/api/v1/reports/monthly/2024/0",
        "/api/v1/reports/monthly/2024/13",
        "/api/v1/reports/monthly/abc/3",
        "/api/v1/reports/annual/20x4",
        "/api/v1/reports/annual/2024/vessels/top?limit=many",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert!(body_json(response).await["error"].is_string());
    }

    let response = app.get("/api/v1/reports/weekly/2024").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
