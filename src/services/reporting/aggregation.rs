use futures::try_join;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Query, SelectStatement},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::dto::{
    AnnualReport, AnnualVesselLine, CategoryBreakdown, CategoryTotal, ClientRanking,
    MonthlyReport, MonthlySummary, PeriodTotals, ProductRanking, VesselDetail, VesselResult,
    VesselTotals,
};
use super::ledger;
use super::period::Period;
use super::rollup;
use super::snapshot::{self, PeriodSnapshot};
use crate::entities::{
    cargo_assignment, charge_category, client, expense, expense_category, operating_charge,
    product, revenue, revenue_category, vessel,
};
use crate::errors::ServiceError;

/// Number of entries in each annual ranking.
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Read-only financial aggregation over the ledger tables.
#[derive(Clone)]
pub struct AggregationService {
    db: Arc<DatabaseConnection>,
}

impl AggregationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Loads every row needed to report on `period`.
    ///
    /// Vessels are attributed by arrival date; their revenues, expenses and cargo
    /// follow them regardless of the transaction dates.
    #[instrument(skip(self))]
    pub async fn load_snapshot(&self, period: Period) -> Result<PeriodSnapshot, ServiceError> {
        let db = &*self.db;
        let arrived = arrived_vessel_ids(period);

        let mut charge_query = operating_charge::Entity::find()
            .filter(operating_charge::Column::Year.eq(period.year));
        if let Some(month) = period.month {
            charge_query = charge_query.filter(operating_charge::Column::Month.eq(month as i32));
        }

        let (start, end) = period.date_range();
        let (vessels, revenues, expenses, charges, cargo) = try_join!(
            vessel::Entity::find()
                .filter(vessel::Column::ArrivalDate.gte(start))
                .filter(vessel::Column::ArrivalDate.lt(end))
                .order_by_asc(vessel::Column::ArrivalDate)
                .order_by_asc(vessel::Column::Id)
                .all(db),
            revenue::Entity::find()
                .filter(revenue::Column::VesselId.in_subquery(arrived.clone()))
                .order_by_asc(revenue::Column::Id)
                .all(db),
            expense::Entity::find()
                .filter(expense::Column::VesselId.in_subquery(arrived.clone()))
                .order_by_asc(expense::Column::Id)
                .all(db),
            charge_query
                .order_by_asc(operating_charge::Column::Id)
                .all(db),
            cargo_assignment::Entity::find()
                .filter(cargo_assignment::Column::VesselId.in_subquery(arrived.clone()))
                .order_by_asc(cargo_assignment::Column::Id)
                .all(db),
        )?;

        let (clients, products, revenue_categories, expense_categories, charge_categories) = try_join!(
            client::Entity::find().all(db),
            product::Entity::find().all(db),
            revenue_category::Entity::find().all(db),
            expense_category::Entity::find().all(db),
            charge_category::Entity::find().all(db),
        )?;

        debug!(
            vessels = vessels.len(),
            revenues = revenues.len(),
            expenses = expenses.len(),
            charges = charges.len(),
            "Loaded period snapshot"
        );

        Ok(PeriodSnapshot {
            period: Some(period),
            vessels,
            revenues,
            expenses,
            charges,
            cargo,
            clients: clients.into_iter().map(|m| (m.id, m)).collect(),
            products: products.into_iter().map(|m| (m.id, m)).collect(),
            revenue_categories: revenue_categories.into_iter().map(|m| (m.id, m)).collect(),
            expense_categories: expense_categories.into_iter().map(|m| (m.id, m)).collect(),
            charge_categories: charge_categories.into_iter().map(|m| (m.id, m)).collect(),
        })
    }

    /// Sums for one vessel. An unknown vessel yields zeros.
    #[instrument(skip(self))]
    pub async fn vessel_totals(&self, vessel_id: i32) -> Result<VesselTotals, ServiceError> {
        let db = &*self.db;
        let (revenues, expenses) = try_join!(
            revenue::Entity::find()
                .filter(revenue::Column::VesselId.eq(vessel_id))
                .all(db),
            expense::Entity::find()
                .filter(expense::Column::VesselId.eq(vessel_id))
                .all(db),
        )?;

        let total_revenue = ledger::sum(revenues.iter().map(|r| r.amount));
        let total_expense = ledger::sum(expenses.iter().map(|e| e.amount));
        Ok(VesselTotals {
            vessel_id,
            total_revenue,
            total_expense,
            net_result: total_revenue - total_expense,
        })
    }

    #[instrument(skip(self))]
    pub async fn period_totals(&self, period: Period) -> Result<PeriodTotals, ServiceError> {
        Ok(self.load_snapshot(period).await?.totals())
    }

    #[instrument(skip(self))]
    pub async fn monthly_series(&self, year: i32) -> Result<Vec<MonthlySummary>, ServiceError> {
        let snapshot = self.load_snapshot(Period::year(year)?).await?;
        Ok(snapshot.monthly_series())
    }

    /// Months of `year` that had at least one vessel call.
    #[instrument(skip(self))]
    pub async fn annual_summary(&self, year: i32) -> Result<Vec<MonthlySummary>, ServiceError> {
        let series = self.monthly_series(year).await?;
        Ok(rollup::active_months(series))
    }

    /// Category statistics for `period`. Month-level charge statistics list
    /// every charge category.
    #[instrument(skip(self))]
    pub async fn category_breakdown(
        &self,
        period: Period,
    ) -> Result<CategoryBreakdown, ServiceError> {
        let snapshot = self.load_snapshot(period).await?;
        Ok(snapshot.category_breakdown(period.month.is_some()))
    }

    #[instrument(skip(self))]
    pub async fn vessel_results(&self, period: Period) -> Result<Vec<VesselResult>, ServiceError> {
        Ok(self.load_snapshot(period).await?.vessel_results())
    }

    #[instrument(skip(self))]
    pub async fn top_vessels(
        &self,
        period: Period,
        limit: usize,
    ) -> Result<Vec<VesselResult>, ServiceError> {
        Ok(self.load_snapshot(period).await?.top_vessels(limit))
    }

    #[instrument(skip(self))]
    pub async fn top_clients(
        &self,
        period: Period,
        limit: usize,
    ) -> Result<Vec<ClientRanking>, ServiceError> {
        Ok(self.load_snapshot(period).await?.top_clients(limit))
    }

    #[instrument(skip(self))]
    pub async fn top_products(
        &self,
        period: Period,
        limit: usize,
    ) -> Result<Vec<ProductRanking>, ServiceError> {
        Ok(self.load_snapshot(period).await?.top_products(limit))
    }

    /// Expenses of one vessel grouped by category.
    #[instrument(skip(self))]
    pub async fn vessel_expense_breakdown(
        &self,
        vessel_id: i32,
    ) -> Result<Vec<CategoryTotal>, ServiceError> {
        let db = &*self.db;
        let (rows, categories) = try_join!(
            expense::Entity::find()
                .filter(expense::Column::VesselId.eq(vessel_id))
                .all(db),
            expense_category::Entity::find().all(db),
        )?;
        let categories: BTreeMap<i32, expense_category::Model> =
            categories.into_iter().map(|c| (c.id, c)).collect();
        Ok(snapshot::expense_category_totals(&rows, &categories))
    }

    /// Charges of one month grouped by category, zero-filled.
    #[instrument(skip(self))]
    pub async fn charge_breakdown(
        &self,
        period: Period,
    ) -> Result<Vec<CategoryTotal>, ServiceError> {
        let db = &*self.db;
        let mut query = operating_charge::Entity::find()
            .filter(operating_charge::Column::Year.eq(period.year));
        if let Some(month) = period.month {
            query = query.filter(operating_charge::Column::Month.eq(month as i32));
        }
        let (rows, categories) = try_join!(query.all(db), charge_category::Entity::find().all(db))?;
        let categories: BTreeMap<i32, charge_category::Model> =
            categories.into_iter().map(|c| (c.id, c)).collect();
        Ok(snapshot::charge_category_totals(
            &rows,
            &categories,
            period.month.is_some(),
        ))
    }

    #[instrument(skip(self))]
    pub async fn charge_total(&self, period: Period) -> Result<Decimal, ServiceError> {
        let breakdown = self.charge_breakdown(period).await?;
        Ok(ledger::sum(breakdown.iter().map(|c| c.total)))
    }

    #[instrument(skip(self))]
    pub async fn monthly_report(&self, period: Period) -> Result<MonthlyReport, ServiceError> {
        let snapshot = self.load_snapshot(period).await?;
        Ok(rollup::monthly_report(&snapshot))
    }

    #[instrument(skip(self))]
    pub async fn annual_report(&self, year: i32) -> Result<AnnualReport, ServiceError> {
        let snapshot = self.load_snapshot(Period::year(year)?).await?;
        rollup::annual_report(&snapshot, DEFAULT_TOP_LIMIT)
    }

    /// Per-vessel detail blocks for every vessel arriving in `period`.
    #[instrument(skip(self))]
    pub async fn vessel_details(&self, period: Period) -> Result<Vec<VesselDetail>, ServiceError> {
        Ok(self.load_snapshot(period).await?.vessel_details())
    }

    #[instrument(skip(self))]
    pub async fn annual_vessels(&self, year: i32) -> Result<Vec<AnnualVesselLine>, ServiceError> {
        let snapshot = self.load_snapshot(Period::year(year)?).await?;
        Ok(snapshot.annual_vessels())
    }
}

fn arrived_vessel_ids(period: Period) -> SelectStatement {
    let (start, end) = period.date_range();
    Query::select()
        .column(vessel::Column::Id)
        .from(vessel::Entity)
        .and_where(vessel::Column::ArrivalDate.gte(start))
        .and_where(vessel::Column::ArrivalDate.lt(end))
        .to_owned()
}
