use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use super::{code_from_name, normalize_optional, required_name};
use crate::entities::{cargo_assignment, product, vessel};
use crate::errors::ServiceError;

/// Product fields accepted on create and update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200, message = "Product name is required"))]
    pub name: String,
    /// Generated from the name when omitted
    #[validate(length(max = 50))]
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Service for managing cargo products
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists products by name
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<product::Model>, ServiceError> {
        Ok(product::Entity::find()
            .order_by_asc(product::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {id} not found")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: ProductInput) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let name = required_name("Product", &input.name)?;
        let code = resolve_code(input.code, &name);
        self.ensure_code_free(&code, None).await?;

        let model = product::ActiveModel {
            name: Set(name),
            code: Set(code),
            description: Set(normalize_optional(input.description)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(product_id = model.id, code = %model.code, "Product created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: ProductInput) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let existing = self.get(id).await?;
        let name = required_name("Product", &input.name)?;
        let code = resolve_code(input.code, &name);
        self.ensure_code_free(&code, Some(id)).await?;

        let mut model: product::ActiveModel = existing.into();
        model.name = Set(name);
        model.code = Set(code);
        model.description = Set(normalize_optional(input.description));
        let updated = model.update(&*self.db).await?;

        info!(product_id = id, "Product updated");
        Ok(updated)
    }

    /// Deletes a product that no cargo assignment references.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        let cargo = cargo_assignment::Entity::find()
            .filter(cargo_assignment::Column::ProductId.eq(id))
            .count(&*self.db)
            .await?;
        if cargo > 0 {
            return Err(ServiceError::Conflict(format!(
                "Product {id} still has {cargo} cargo assignment(s)"
            )));
        }

        product::Entity::delete_by_id(existing.id)
            .exec(&*self.db)
            .await?;
        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Vessels that carried the product, latest arrival first.
    #[instrument(skip(self))]
    pub async fn vessels(&self, id: i32) -> Result<Vec<vessel::Model>, ServiceError> {
        self.get(id).await?;
        let vessel_ids: Vec<i32> = cargo_assignment::Entity::find()
            .select_only()
            .column(cargo_assignment::Column::VesselId)
            .filter(cargo_assignment::Column::ProductId.eq(id))
            .distinct()
            .into_tuple()
            .all(&*self.db)
            .await?;

        Ok(vessel::Entity::find()
            .filter(vessel::Column::Id.is_in(vessel_ids))
            .order_by_desc(vessel::Column::ArrivalDate)
            .all(&*self.db)
            .await?)
    }

    /// Finds a product by exact name, then by derived code, creating it when
    /// neither exists.
    #[instrument(skip(db))]
    pub(crate) async fn find_or_create_by_name<C>(
        db: &C,
        name: &str,
    ) -> Result<product::Model, ServiceError>
    where
        C: sea_orm::ConnectionTrait,
    {
        let name = required_name("Product", name)?;
        let name = name.as_str();
        if let Some(found) = product::Entity::find()
            .filter(product::Column::Name.eq(name))
            .one(db)
            .await?
        {
            return Ok(found);
        }

        let code = code_from_name(name);
        if let Some(found) = product::Entity::find()
            .filter(product::Column::Code.eq(code.as_str()))
            .one(db)
            .await?
        {
            return Ok(found);
        }

        let created = product::ActiveModel {
            name: Set(name.to_string()),
            code: Set(code),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!(product_id = created.id, "Product created from cargo assignment");
        Ok(created)
    }

    async fn ensure_code_free(&self, code: &str, except: Option<i32>) -> Result<(), ServiceError> {
        let mut query = product::Entity::find().filter(product::Column::Code.eq(code));
        if let Some(id) = except {
            query = query.filter(product::Column::Id.ne(id));
        }
        if query.count(&*self.db).await? > 0 {
            return Err(ServiceError::InvalidInput(format!(
                "Product code {code} is already in use"
            )));
        }
        Ok(())
    }
}

fn resolve_code(code: Option<String>, name: &str) -> String {
    normalize_optional(code)
        .map(|c| c.to_uppercase())
        .unwrap_or_else(|| code_from_name(name))
}
