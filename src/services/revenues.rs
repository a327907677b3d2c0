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
use crate::entities::{revenue, revenue_category, vessel};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RevenueInput {
    pub vessel_id: i32,
    pub category_id: i32,
    pub amount: Decimal,
    pub revenue_date: NaiveDate,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Revenue row with its category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RevenueLine {
    #[serde(flatten)]
    pub revenue: revenue::Model,
    pub category_name: String,
    pub category_group: String,
}

/// Service for revenue lines booked against vessel calls
#[derive(Clone)]
pub struct RevenueService {
    db: Arc<DatabaseConnection>,
}

impl RevenueService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<revenue_category::Model>, ServiceError> {
        Ok(revenue_category::Entity::find()
            .order_by_asc(revenue_category::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Revenues of one vessel, oldest first
    #[instrument(skip(self))]
    pub async fn list_by_vessel(&self, vessel_id: i32) -> Result<Vec<RevenueLine>, ServiceError> {
        let rows = revenue::Entity::find()
            .filter(revenue::Column::VesselId.eq(vessel_id))
            .order_by_asc(revenue::Column::RevenueDate)
            .order_by_asc(revenue::Column::Id)
            .find_also_related(revenue_category::Entity)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(revenue, category)| RevenueLine {
                category_name: category.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
                category_group: category.map(|c| c.category_group).unwrap_or_default(),
                revenue,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn total_for_vessel(&self, vessel_id: i32) -> Result<VesselLedgerTotal, ServiceError> {
        let rows = revenue::Entity::find()
            .filter(revenue::Column::VesselId.eq(vessel_id))
            .all(&*self.db)
            .await?;
        Ok(VesselLedgerTotal {
            vessel_id,
            operation_count: rows.len() as u64,
            total: ledger::sum(rows.iter().map(|r| r.amount)),
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<revenue::Model, ServiceError> {
        revenue::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Revenue {id} not found")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: RevenueInput) -> Result<revenue::Model, ServiceError> {
        self.check(&input).await?;
        let model = revenue::ActiveModel {
            vessel_id: Set(input.vessel_id),
            category_id: Set(input.category_id),
            amount: Set(input.amount),
            revenue_date: Set(input.revenue_date),
            description: Set(normalize_optional(input.description)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(revenue_id = model.id, vessel_id = model.vessel_id, amount = %model.amount, "Revenue recorded");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: RevenueInput) -> Result<revenue::Model, ServiceError> {
        let existing = self.get(id).await?;
        self.check(&input).await?;

        let mut model: revenue::ActiveModel = existing.into();
        model.vessel_id = Set(input.vessel_id);
        model.category_id = Set(input.category_id);
        model.amount = Set(input.amount);
        model.revenue_date = Set(input.revenue_date);
        model.description = Set(normalize_optional(input.description));
        let updated = model.update(&*self.db).await?;

        info!(revenue_id = id, "Revenue updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = revenue::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Revenue {id} not found")));
        }
        info!(revenue_id = id, "Revenue deleted");
        Ok(())
    }

    async fn check(&self, input: &RevenueInput) -> Result<(), ServiceError> {
        input.validate()?;
        ensure_storable_amount("amount", input.amount)?;

        let (vessel, category) = futures::try_join!(
            vessel::Entity::find_by_id(input.vessel_id).one(&*self.db),
            revenue_category::Entity::find_by_id(input.category_id).one(&*self.db),
        )?;
        if vessel.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "Vessel {} does not exist",
                input.vessel_id
            )));
        }
        if category.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "Revenue category {} does not exist",
                input.category_id
            )));
        }
        Ok(())
    }
}
