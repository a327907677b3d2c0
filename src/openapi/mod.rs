use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shipping Ledger API",
        version = "1.0.0",
        description = r#"
# Shipping Ledger API

Financial tracking for a shipping agency: vessel calls, their clients and
products, the revenues and expenses booked against each call, the agency's
monthly operating charges, and the derived monthly and annual reports.

## Periods

Vessels belong to the month of their arrival date. Their revenues, expenses and
cargo follow them. Operating charges carry their own month and year.

## Error Handling

Every failure returns a JSON body with an `error` message:

```json
{
  "error": "Vessel 42 not found",
  "status": 404,
  "timestamp": "2024-01-01T00:00:00Z"
}
```

- `400` malformed payload, failed validation or malformed period
- `404` unknown entity on a single-item read, update or delete
- `409` deleting a vessel that still has revenues or expenses
- `500` anything else
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "vessels", description = "Vessel calls and their cargo"),
        (name = "clients", description = "Cargo clients"),
        (name = "products", description = "Cargo products"),
        (name = "revenues", description = "Revenues booked against vessel calls"),
        (name = "expenses", description = "Expenses booked against vessel calls"),
        (name = "charges", description = "Monthly operating charges of the agency"),
        (name = "reports", description = "Monthly and annual aggregates"),
        (name = "exports", description = "Spreadsheet and document downloads"),
        (name = "settings", description = "Company profile"),
        (name = "health", description = "Health check")
    ),
    paths(
        // Vessels
        handlers::vessels::list_vessels,
        handlers::vessels::list_vessels_by_month,
        handlers::vessels::get_vessel,
        handlers::vessels::create_vessel,
        handlers::vessels::update_vessel,
        handlers::vessels::delete_vessel,
        handlers::vessels::vessel_result,
        handlers::vessels::vessel_results_by_month,
        handlers::vessels::vessel_details,
        handlers::vessels::list_cargo,
        handlers::vessels::add_cargo,
        handlers::vessels::remove_cargo,

        // Clients and products
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,
        handlers::clients::client_vessels,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::product_vessels,

        // Ledger
        handlers::revenues::list_revenue_categories,
        handlers::revenues::list_vessel_revenues,
        handlers::revenues::vessel_revenue_total,
        handlers::revenues::get_revenue,
        handlers::revenues::create_revenue,
        handlers::revenues::update_revenue,
        handlers::revenues::delete_revenue,
        handlers::expenses::list_expense_categories,
        handlers::expenses::list_vessel_expenses,
        handlers::expenses::vessel_expense_total,
        handlers::expenses::vessel_expenses_by_category,
        handlers::expenses::get_expense,
        handlers::expenses::create_expense,
        handlers::expenses::update_expense,
        handlers::expenses::delete_expense,
        handlers::charges::list_charge_categories,
        handlers::charges::list_month_charges,
        handlers::charges::month_charges_by_category,
        handlers::charges::month_charge_total,
        handlers::charges::list_year_charges,
        handlers::charges::get_charge,
        handlers::charges::create_charge,
        handlers::charges::upsert_charge,
        handlers::charges::update_charge,
        handlers::charges::delete_charge,

        // Reports
        handlers::reports::monthly_totals,
        handlers::reports::monthly_vessels,
        handlers::reports::monthly_categories,
        handlers::reports::annual_totals,
        handlers::reports::annual_summary,
        handlers::reports::annual_evolution,
        handlers::reports::annual_categories,
        handlers::reports::annual_complete,
        handlers::reports::annual_vessels,
        handlers::reports::annual_top_vessels,
        handlers::reports::annual_top_clients,
        handlers::reports::annual_top_products,
        handlers::exports::export_monthly_xlsx,
        handlers::exports::export_monthly_pdf,
        handlers::exports::export_annual_xlsx,

        handlers::settings::get_settings,
        handlers::health::health_check,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,
            crate::entities::VesselStatus,
            crate::services::reporting::Period,
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_ledger_routes() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Shipping Ledger API"));
        assert!(json.contains("/api/v1/vessels/{id}/cargo"));
        assert!(json.contains("/api/v1/charges/upsert"));
        assert!(json.contains("/api/v1/reports/export/annual/{year}/xlsx"));
        assert!(json.contains("/health"));
    }
}
