//! Spreadsheet and document renderers for the monthly and annual reports.
//!
//! Renderers take the typed report structures produced by the aggregation
//! layer and return the artifact bytes; they never touch the database.

pub mod currency;
pub mod pdf_monthly;
pub mod xlsx_annual;
pub mod xlsx_monthly;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::CompanyConfig;

pub use currency::format_amount;
pub use pdf_monthly::render_monthly_pdf;
pub use xlsx_annual::render_annual_xlsx;
pub use xlsx_monthly::render_monthly_xlsx;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, thiserror::Error, Serialize)]
pub enum RenderError {
    #[error("Spreadsheet rendering failed: {0}")]
    Xlsx(String),
    #[error("Document rendering failed: {0}")]
    Pdf(String),
}

impl From<rust_xlsxwriter::XlsxError> for RenderError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        RenderError::Xlsx(err.to_string())
    }
}

/// Deployment details printed on every artifact.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub company_name: String,
    pub developer: Option<String>,
    pub currency_code: String,
    pub generated_on: NaiveDate,
}

impl RenderContext {
    pub fn new(company: &CompanyConfig, generated_on: NaiveDate) -> Self {
        Self {
            company_name: company.name.clone(),
            developer: company.developer.clone(),
            currency_code: company.currency_code.clone(),
            generated_on,
        }
    }

    pub fn amount(&self, value: rust_decimal::Decimal) -> String {
        format_amount(value, &self.currency_code)
    }
}

pub fn monthly_xlsx_filename(year: i32, month: u32) -> String {
    format!("rapport_its_{year}_{month}.xlsx")
}

pub fn monthly_pdf_filename(year: i32, month: u32) -> String {
    format!("rapport_its_{year}_{month}.pdf")
}

pub fn annual_xlsx_filename(year: i32) -> String {
    format!("rapport_annuel_its_{year}.xlsx")
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::services::reporting::snapshot::fixtures::*;
    use crate::services::reporting::snapshot::PeriodSnapshot;
    use crate::services::reporting::Period;
    use crate::entities::revenue_category;
    use rust_decimal_macros::dec;

    pub fn context() -> RenderContext {
        RenderContext {
            company_name: "International Trading & Shipping".into(),
            developer: Some("Agence ITS".into()),
            currency_code: "XOF".into(),
            generated_on: date(2024, 4, 2),
        }
    }

    /// Two vessels arriving in March 2024 with cargo, ledger rows and a charge.
    pub fn march_snapshot() -> PeriodSnapshot {
        let mut snap = PeriodSnapshot::new(Period::month(2024, 3).unwrap());
        snap.vessels = vec![
            vessel(1, "MV Atlantic", date(2024, 3, 5)),
            vessel(2, "MV Gulf", date(2024, 3, 18)),
        ];
        snap.revenues = vec![
            revenue(1, 1, 1, dec!(500000)),
            revenue(2, 2, 2, dec!(120000)),
        ];
        snap.expenses = vec![expense(1, 1, 1, dec!(200000)), expense(2, 2, 1, dec!(150000))];
        snap.charges = vec![charge(1, 1, 2024, 3, dec!(50000))];
        snap.clients.insert(1, client(1, "Sogeco"));
        snap.products.insert(1, product(1, "Clinker"));
        snap.cargo = vec![cargo(1, 1, 1, 1, dec!(3000))];
        snap.revenue_categories = [(1, "Consignation"), (2, "Manutention")]
            .into_iter()
            .map(|(id, name)| {
                (
                    id,
                    revenue_category::Model {
                        id,
                        name: name.into(),
                        category_group: "Agence".into(),
                    },
                )
            })
            .collect();
        snap
    }
}
