//! Typed report structures shared by the JSON endpoints and the renderers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::VesselStatus;

/// Revenue, expense and charge sums for a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VesselTotals {
    pub vessel_id: i32,
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    pub net_result: Decimal,
}

/// Financial totals of a month or a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PeriodTotals {
    pub year: i32,
    pub month: Option<u32>,
    pub vessel_count: u64,
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    pub net_vessel_result: Decimal,
    pub operating_charges: Decimal,
    pub global_result: Decimal,
}

impl PeriodTotals {
    /// Derives both results from the three raw sums.
    pub fn from_sums(
        year: i32,
        month: Option<u32>,
        vessel_count: u64,
        total_revenue: Decimal,
        total_expense: Decimal,
        operating_charges: Decimal,
    ) -> Self {
        let net_vessel_result = total_revenue - total_expense;
        Self {
            year,
            month,
            vessel_count,
            total_revenue,
            total_expense,
            net_vessel_result,
            operating_charges,
            global_result: net_vessel_result - operating_charges,
        }
    }
}

/// One entry of the 12-month evolution series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlySummary {
    pub month_name: String,
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

/// Grouped total for one category.
///
/// `code` is set for expense and charge categories, `group` for revenue categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryTotal {
    pub category_id: i32,
    pub name: String,
    pub code: Option<String>,
    pub group: Option<String>,
    pub operation_count: u64,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryBreakdown {
    pub revenues: Vec<CategoryTotal>,
    pub expenses: Vec<CategoryTotal>,
    pub charges: Vec<CategoryTotal>,
}

/// Net result of a single vessel call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VesselResult {
    pub vessel_id: i32,
    pub name: String,
    pub imo_number: Option<String>,
    pub arrival_date: NaiveDate,
    pub departure_date: Option<NaiveDate>,
    pub status: VesselStatus,
    pub client_count: u64,
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    pub net_result: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClientRanking {
    pub rank: u32,
    pub client_id: i32,
    pub name: String,
    pub code: String,
    pub vessel_count: u64,
    pub tonnage: Decimal,
    pub products: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductRanking {
    pub rank: u32,
    pub product_id: i32,
    pub name: String,
    pub code: String,
    pub vessel_count: u64,
    pub client_count: u64,
    pub tonnage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductTonnage {
    pub name: String,
    pub tonnage: Decimal,
}

/// A dated revenue or expense line within a vessel detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetailLine {
    pub category_id: i32,
    pub category: String,
    pub label: Option<String>,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Everything the monthly report shows about one vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VesselDetail {
    #[serde(flatten)]
    pub result: VesselResult,
    pub clients: Vec<String>,
    pub products: Vec<ProductTonnage>,
    pub revenue_by_category: Vec<CategoryTotal>,
    pub expense_by_category: Vec<CategoryTotal>,
    pub revenues: Vec<DetailLine>,
    pub expenses: Vec<DetailLine>,
}

/// Row of the annual vessel listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnnualVesselLine {
    #[serde(flatten)]
    pub result: VesselResult,
    pub month: u32,
    pub month_name: String,
    pub clients: Vec<String>,
    pub products: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyReport {
    pub totals: PeriodTotals,
    pub vessels: Vec<VesselDetail>,
    pub statistics: CategoryBreakdown,
}

/// Composite annual report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnnualReport {
    pub year: i32,
    /// Months that had at least one vessel call
    pub summary: Vec<MonthlySummary>,
    pub totals: PeriodTotals,
    pub statistics: CategoryBreakdown,
    pub top_vessels: Vec<VesselResult>,
    pub top_clients: Vec<ClientRanking>,
    pub top_products: Vec<ProductRanking>,
    /// Always twelve entries, January first
    pub evolution: Vec<MonthlySummary>,
    pub vessels: Vec<AnnualVesselLine>,
}

/// Sum of one kind of ledger row for a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VesselLedgerTotal {
    pub vessel_id: i32,
    pub operation_count: u64,
    pub total: Decimal,
}

/// A single amount attached to a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PeriodAmount {
    pub year: i32,
    pub month: Option<u32>,
    pub total: Decimal,
}
