use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use super::reporting::dto::VesselLedgerTotal;
use super::reporting::ledger;
use super::{ensure_storable_amount, normalize_optional};
use crate::entities::{expense, expense_category, vessel};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ExpenseInput {
    pub vessel_id: i32,
    pub category_id: i32,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Expense row with its category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExpenseLine {
    #[serde(flatten)]
    pub expense: expense::Model,
    pub category_name: String,
    pub category_code: String,
}

/// Service for expense lines booked against vessel calls
#[derive(Clone)]
pub struct ExpenseService {
    db: Arc<DatabaseConnection>,
}

impl ExpenseService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<expense_category::Model>, ServiceError> {
        Ok(expense_category::Entity::find()
            .order_by_asc(expense_category::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Expenses of one vessel, oldest first
    #[instrument(skip(self))]
    pub async fn list_by_vessel(&self, vessel_id: i32) -> Result<Vec<ExpenseLine>, ServiceError> {
        let rows = expense::Entity::find()
            .filter(expense::Column::VesselId.eq(vessel_id))
            .order_by_asc(expense::Column::ExpenseDate)
            .order_by_asc(expense::Column::Id)
            .find_also_related(expense_category::Entity)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(expense, category)| ExpenseLine {
                category_name: category.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
                category_code: category.map(|c| c.code).unwrap_or_default(),
                expense,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn total_for_vessel(&self, vessel_id: i32) -> Result<VesselLedgerTotal, ServiceError> {
        let rows = expense::Entity::find()
            .filter(expense::Column::VesselId.eq(vessel_id))
            .all(&*self.db)
            .await?;
        Ok(VesselLedgerTotal {
            vessel_id,
            operation_count: rows.len() as u64,
            total: ledger::sum(rows.iter().map(|r| r.amount)),
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<expense::Model, ServiceError> {
        expense::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {id} not found")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: ExpenseInput) -> Result<expense::Model, ServiceError> {
        self.check(&input).await?;
        let model = expense::ActiveModel {
            vessel_id: Set(input.vessel_id),
            category_id: Set(input.category_id),
            amount: Set(input.amount),
            expense_date: Set(input.expense_date),
            description: Set(normalize_optional(input.description)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(expense_id = model.id, vessel_id = model.vessel_id, amount = %model.amount, "Expense recorded");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: ExpenseInput) -> Result<expense::Model, ServiceError> {
        let existing = self.get(id).await?;
        self.check(&input).await?;

        let mut model: expense::ActiveModel = existing.into();
        model.vessel_id = Set(input.vessel_id);
        model.category_id = Set(input.category_id);
        model.amount = Set(input.amount);
        model.expense_date = Set(input.expense_date);
        model.description = Set(normalize_optional(input.description));
        let updated = model.update(&*self.db).await?;

        info!(expense_id = id, "Expense updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = expense::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Expense {id} not found")));
        }
        info!(expense_id = id, "Expense deleted");
        Ok(())
    }

    async fn check(&self, input: &ExpenseInput) -> Result<(), ServiceError> {
        input.validate()?;
        ensure_storable_amount("amount", input.amount)?;

        let (vessel, category) = futures::try_join!(
            vessel::Entity::find_by_id(input.vessel_id).one(&*self.db),
            expense_category::Entity::find_by_id(input.category_id).one(&*self.db),
        )?;
        if vessel.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "Vessel {} does not exist",
                input.vessel_id
            )));
        }
        if category.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "Expense category {} does not exist",
                input.category_id
            )));
        }
        Ok(())
    }
}
