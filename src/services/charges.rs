use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use super::reporting::Period;
use super::{ensure_storable_amount, normalize_optional};
use crate::entities::{charge_category, operating_charge};
use crate::errors::ServiceError;

/// Operating charge for one category and month.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChargeInput {
    pub category_id: i32,
    pub amount: Decimal,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: u32,
    #[validate(range(min = 1900, max = 9999))]
    pub year: i32,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Fields that may change on an existing charge; its category and period are fixed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChargeUpdate {
    pub amount: Decimal,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChargeLine {
    #[serde(flatten)]
    pub charge: operating_charge::Model,
    pub category_name: String,
    pub category_code: String,
}

/// Service for monthly operating charges of the agency
#[derive(Clone)]
pub struct ChargeService {
    db: Arc<DatabaseConnection>,
}

impl ChargeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<charge_category::Model>, ServiceError> {
        Ok(charge_category::Entity::find()
            .order_by_asc(charge_category::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Charges of a month, or of a whole year, in period then category order.
    #[instrument(skip(self))]
    pub async fn list(&self, period: Period) -> Result<Vec<ChargeLine>, ServiceError> {
        let mut query = operating_charge::Entity::find()
            .filter(operating_charge::Column::Year.eq(period.year));
        if let Some(month) = period.month {
            query = query.filter(operating_charge::Column::Month.eq(month as i32));
        }

        let rows = query
            .order_by_asc(operating_charge::Column::Month)
            .order_by_asc(operating_charge::Column::CategoryId)
            .find_also_related(charge_category::Entity)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(charge, category)| ChargeLine {
                category_name: category.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
                category_code: category.map(|c| c.code).unwrap_or_default(),
                charge,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<operating_charge::Model, ServiceError> {
        operating_charge::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Operating charge {id} not found")))
    }

    /// Records a new charge; a charge already booked for the same category and
    /// month is refused.
    #[instrument(skip(self))]
    pub async fn create(&self, input: ChargeInput) -> Result<operating_charge::Model, ServiceError> {
        self.check(&input).await?;

        let existing = self
            .period_query(input.category_id, input.month, input.year)
            .count(&*self.db)
            .await?;
        if existing > 0 {
            return Err(ServiceError::InvalidInput(format!(
                "A charge for category {} already exists for {:02}/{}",
                input.category_id, input.month, input.year
            )));
        }

        let model = operating_charge::ActiveModel {
            category_id: Set(input.category_id),
            amount: Set(input.amount),
            month: Set(input.month as i32),
            year: Set(input.year),
            description: Set(normalize_optional(input.description)),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(charge_id = model.id, category_id = model.category_id, "Operating charge recorded");
        Ok(model)
    }

    /// Inserts the charge or overwrites the amount and description of the one
    /// already booked for that category and month.
    #[instrument(skip(self))]
    pub async fn upsert(&self, input: ChargeInput) -> Result<operating_charge::Model, ServiceError> {
        self.check(&input).await?;
        let now = Utc::now();

        let model = operating_charge::ActiveModel {
            category_id: Set(input.category_id),
            amount: Set(input.amount),
            month: Set(input.month as i32),
            year: Set(input.year),
            description: Set(normalize_optional(input.description)),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        operating_charge::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    operating_charge::Column::CategoryId,
                    operating_charge::Column::Month,
                    operating_charge::Column::Year,
                ])
                .update_columns([
                    operating_charge::Column::Amount,
                    operating_charge::Column::Description,
                    operating_charge::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        let stored = self
            .period_query(input.category_id, input.month, input.year)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError("Upserted operating charge could not be read back".into())
            })?;

        info!(charge_id = stored.id, amount = %stored.amount, "Operating charge upserted");
        Ok(stored)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        input: ChargeUpdate,
    ) -> Result<operating_charge::Model, ServiceError> {
        input.validate()?;
        ensure_storable_amount("amount", input.amount)?;
        let existing = self.get(id).await?;

        let mut model: operating_charge::ActiveModel = existing.into();
        model.amount = Set(input.amount);
        model.description = Set(normalize_optional(input.description));
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&*self.db).await?;

        info!(charge_id = id, "Operating charge updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = operating_charge::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Operating charge {id} not found")));
        }
        info!(charge_id = id, "Operating charge deleted");
        Ok(())
    }

    fn period_query(
        &self,
        category_id: i32,
        month: u32,
        year: i32,
    ) -> sea_orm::Select<operating_charge::Entity> {
        operating_charge::Entity::find()
            .filter(operating_charge::Column::CategoryId.eq(category_id))
            .filter(operating_charge::Column::Month.eq(month as i32))
            .filter(operating_charge::Column::Year.eq(year))
    }

    async fn check(&self, input: &ChargeInput) -> Result<(), ServiceError> {
        input.validate()?;
        ensure_storable_amount("amount", input.amount)?;
        if charge_category::Entity::find_by_id(input.category_id)
            .one(&*self.db)
            .await?
            .is_none()
        {
            return Err(ServiceError::InvalidInput(format!(
                "Charge category {} does not exist",
                input.category_id
            )));
        }
        Ok(())
    }
}
