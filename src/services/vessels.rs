use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::clients::ClientService;
use super::products::ProductService;
use super::reporting::dto::VesselDetail;
use super::reporting::snapshot::PeriodSnapshot;
use super::reporting::Period;
use super::{ensure_storable_amount, normalize_optional, required_name};
use crate::entities::{
    cargo_assignment, client, expense, expense_category, product, revenue, revenue_category,
    vessel, VesselStatus,
};
use crate::errors::ServiceError;

/// Vessel call fields accepted on create and update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VesselInput {
    #[validate(length(min = 1, max = 200, message = "Vessel name is required"))]
    pub name: String,
    #[validate(length(max = 20))]
    pub imo_number: Option<String>,
    pub arrival_date: NaiveDate,
    pub departure_date: Option<NaiveDate>,
    pub status: Option<VesselStatus>,
    pub total_tonnage: Option<Decimal>,
}

/// A client/product cargo line to attach to a vessel. Either the id or the
/// name identifies each side; unknown names are created.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CargoInput {
    pub client_id: Option<i32>,
    pub client_name: Option<String>,
    pub product_id: Option<i32>,
    pub product_name: Option<String>,
    pub tonnage: Option<Decimal>,
    pub loading_date: Option<NaiveDate>,
}

/// Vessel with the names of the clients and products it carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VesselSummary {
    #[serde(flatten)]
    pub vessel: vessel::Model,
    pub clients: Vec<String>,
    pub products: Vec<String>,
}

/// Cargo assignment with its client and product names resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CargoLine {
    #[serde(flatten)]
    pub assignment: cargo_assignment::Model,
    pub client_name: String,
    pub product_name: String,
}

/// Service for managing vessel calls and their cargo
#[derive(Clone)]
pub struct VesselService {
    db: Arc<DatabaseConnection>,
}

impl VesselService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists every vessel, latest arrival first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<VesselSummary>, ServiceError> {
        let vessels = vessel::Entity::find()
            .order_by_desc(vessel::Column::ArrivalDate)
            .order_by_desc(vessel::Column::Id)
            .all(&*self.db)
            .await?;
        self.summarize(vessels).await
    }

    /// Vessels that arrived during the given month
    #[instrument(skip(self))]
    pub async fn list_by_month(&self, period: Period) -> Result<Vec<VesselSummary>, ServiceError> {
        let (start, end) = period.date_range();
        let vessels = vessel::Entity::find()
            .filter(vessel::Column::ArrivalDate.gte(start))
            .filter(vessel::Column::ArrivalDate.lt(end))
            .order_by_asc(vessel::Column::ArrivalDate)
            .order_by_asc(vessel::Column::Id)
            .all(&*self.db)
            .await?;
        self.summarize(vessels).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<vessel::Model, ServiceError> {
        vessel::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vessel {id} not found")))
    }

    /// Full financial detail of one vessel call.
    #[instrument(skip(self))]
    pub async fn details(&self, id: i32) -> Result<VesselDetail, ServiceError> {
        let vessel = self.get(id).await?;
        let db = &*self.db;

        let (revenues, expenses, cargo) = futures::try_join!(
            revenue::Entity::find()
                .filter(revenue::Column::VesselId.eq(id))
                .order_by_asc(revenue::Column::Id)
                .all(db),
            expense::Entity::find()
                .filter(expense::Column::VesselId.eq(id))
                .order_by_asc(expense::Column::Id)
                .all(db),
            cargo_assignment::Entity::find()
                .filter(cargo_assignment::Column::VesselId.eq(id))
                .order_by_asc(cargo_assignment::Column::Id)
                .all(db),
        )?;
        let (clients, products, revenue_categories, expense_categories) = futures::try_join!(
            client::Entity::find().all(db),
            product::Entity::find().all(db),
            revenue_category::Entity::find().all(db),
            expense_category::Entity::find().all(db),
        )?;

        let snapshot = PeriodSnapshot {
            vessels: vec![vessel],
            revenues,
            expenses,
            cargo,
            clients: clients.into_iter().map(|m| (m.id, m)).collect(),
            products: products.into_iter().map(|m| (m.id, m)).collect(),
            revenue_categories: revenue_categories.into_iter().map(|m| (m.id, m)).collect(),
            expense_categories: expense_categories.into_iter().map(|m| (m.id, m)).collect(),
            ..Default::default()
        };

        snapshot
            .vessel_details()
            .pop()
            .ok_or_else(|| ServiceError::NotFound(format!("Vessel {id} not found")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: VesselInput) -> Result<vessel::Model, ServiceError> {
        let input = checked(input)?;
        let model = vessel::ActiveModel {
            name: Set(input.name.trim().to_string()),
            imo_number: Set(normalize_optional(input.imo_number)),
            arrival_date: Set(input.arrival_date),
            departure_date: Set(input.departure_date),
            status: Set(input.status.unwrap_or_default()),
            total_tonnage: Set(input.total_tonnage.unwrap_or(Decimal::ZERO)),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(vessel_id = model.id, arrival = %model.arrival_date, "Vessel created");
        Ok(model)
    }

    /// Replaces every mutable field of the vessel.
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: VesselInput) -> Result<vessel::Model, ServiceError> {
        let input = checked(input)?;
        let existing = self.get(id).await?;

        let mut model: vessel::ActiveModel = existing.into();
        model.name = Set(input.name.trim().to_string());
        model.imo_number = Set(normalize_optional(input.imo_number));
        model.arrival_date = Set(input.arrival_date);
        model.departure_date = Set(input.departure_date);
        model.status = Set(input.status.unwrap_or_default());
        model.total_tonnage = Set(input.total_tonnage.unwrap_or(Decimal::ZERO));
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&*self.db).await?;

        info!(vessel_id = id, "Vessel updated");
        Ok(updated)
    }

    /// Deletes a vessel and its cargo assignments. Vessels that still carry
    /// revenues or expenses are refused.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        if vessel::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(ServiceError::NotFound(format!("Vessel {id} not found")));
        }

        let revenues = revenue::Entity::find()
            .filter(revenue::Column::VesselId.eq(id))
            .count(&txn)
            .await?;
        let expenses = expense::Entity::find()
            .filter(expense::Column::VesselId.eq(id))
            .count(&txn)
            .await?;
        if revenues + expenses > 0 {
            warn!(vessel_id = id, revenues, expenses, "Refusing to delete vessel with ledger rows");
            return Err(ServiceError::Conflict(format!(
                "Vessel {id} still has {revenues} revenue(s) and {expenses} expense(s)"
            )));
        }

        let cargo = cargo_assignment::Entity::delete_many()
            .filter(cargo_assignment::Column::VesselId.eq(id))
            .exec(&txn)
            .await?;
        vessel::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(vessel_id = id, cargo_removed = cargo.rows_affected, "Vessel deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn cargo(&self, vessel_id: i32) -> Result<Vec<CargoLine>, ServiceError> {
        self.get(vessel_id).await?;
        let rows = cargo_assignment::Entity::find()
            .filter(cargo_assignment::Column::VesselId.eq(vessel_id))
            .order_by_asc(cargo_assignment::Column::Id)
            .all(&*self.db)
            .await?;
        let (clients, products) = self.name_lookups().await?;

        Ok(rows
            .into_iter()
            .map(|assignment| CargoLine {
                client_name: clients.get(&assignment.client_id).cloned().unwrap_or_default(),
                product_name: products
                    .get(&assignment.product_id)
                    .cloned()
                    .unwrap_or_default(),
                assignment,
            })
            .collect())
    }

    /// Attaches a cargo line, creating the client or product on the fly when
    /// only a new name is given.
    #[instrument(skip(self))]
    pub async fn add_cargo(
        &self,
        vessel_id: i32,
        input: CargoInput,
    ) -> Result<cargo_assignment::Model, ServiceError> {
        let tonnage = input.tonnage.unwrap_or(Decimal::ZERO);
        ensure_storable_amount("tonnage", tonnage)?;

        let txn = self.db.begin().await?;
        if vessel::Entity::find_by_id(vessel_id).one(&txn).await?.is_none() {
            return Err(ServiceError::NotFound(format!("Vessel {vessel_id} not found")));
        }

        let client_id = match (input.client_id, input.client_name.as_deref()) {
            (Some(id), _) => client::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .map(|c| c.id)
                .ok_or_else(|| ServiceError::InvalidInput(format!("Client {id} does not exist")))?,
            (None, Some(name)) => ClientService::find_or_create_by_name(&txn, name).await?.id,
            (None, None) => {
                return Err(ServiceError::InvalidInput(
                    "A client id or client name is required".into(),
                ))
            }
        };

        let product_id = match (input.product_id, input.product_name.as_deref()) {
            (Some(id), _) => product::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .map(|p| p.id)
                .ok_or_else(|| ServiceError::InvalidInput(format!("Product {id} does not exist")))?,
            (None, Some(name)) => ProductService::find_or_create_by_name(&txn, name).await?.id,
            (None, None) => {
                return Err(ServiceError::InvalidInput(
                    "A product id or product name is required".into(),
                ))
            }
        };

        let assignment = cargo_assignment::ActiveModel {
            vessel_id: Set(vessel_id),
            client_id: Set(client_id),
            product_id: Set(product_id),
            tonnage: Set(tonnage),
            loading_date: Set(input.loading_date),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(
            vessel_id,
            assignment_id = assignment.id,
            client_id,
            product_id,
            "Cargo assignment added"
        );
        Ok(assignment)
    }

    #[instrument(skip(self))]
    pub async fn remove_cargo(&self, vessel_id: i32, assignment_id: i32) -> Result<(), ServiceError> {
        let result = cargo_assignment::Entity::delete_many()
            .filter(cargo_assignment::Column::Id.eq(assignment_id))
            .filter(cargo_assignment::Column::VesselId.eq(vessel_id))
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Cargo assignment {assignment_id} not found on vessel {vessel_id}"
            )));
        }
        info!(vessel_id, assignment_id, "Cargo assignment removed");
        Ok(())
    }

    async fn summarize(
        &self,
        vessels: Vec<vessel::Model>,
    ) -> Result<Vec<VesselSummary>, ServiceError> {
        let ids: Vec<i32> = vessels.iter().map(|v| v.id).collect();
        let cargo = cargo_assignment::Entity::find()
            .filter(cargo_assignment::Column::VesselId.is_in(ids))
            .all(&*self.db)
            .await?;
        let (clients, products) = self.name_lookups().await?;

        let mut per_vessel: BTreeMap<i32, (BTreeSet<String>, BTreeSet<String>)> = BTreeMap::new();
        for line in &cargo {
            let entry = per_vessel.entry(line.vessel_id).or_default();
            if let Some(name) = clients.get(&line.client_id) {
                entry.0.insert(name.clone());
            }
            if let Some(name) = products.get(&line.product_id) {
                entry.1.insert(name.clone());
            }
        }

        Ok(vessels
            .into_iter()
            .map(|vessel| {
                let (clients, products) = per_vessel.remove(&vessel.id).unwrap_or_default();
                VesselSummary {
                    vessel,
                    clients: clients.into_iter().collect(),
                    products: products.into_iter().collect(),
                }
            })
            .collect())
    }

    async fn name_lookups(
        &self,
    ) -> Result<(BTreeMap<i32, String>, BTreeMap<i32, String>), ServiceError> {
        let (clients, products) = futures::try_join!(
            client::Entity::find().all(&*self.db),
            product::Entity::find().all(&*self.db),
        )?;
        Ok((
            clients.into_iter().map(|c| (c.id, c.name)).collect(),
            products.into_iter().map(|p| (p.id, p.name)).collect(),
        ))
    }
}

fn checked(input: VesselInput) -> Result<VesselInput, ServiceError> {
    input.validate()?;
    required_name("Vessel", &input.name)?;
    if let Some(departure) = input.departure_date {
        if departure < input.arrival_date {
            return Err(ServiceError::InvalidInput(
                "Departure date cannot precede arrival date".into(),
            ));
        }
    }
    if let Some(tonnage) = input.total_tonnage {
        ensure_storable_amount("total_tonnage", tonnage)?;
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn input() -> VesselInput {
        VesselInput {
            name: "MV Atlantic".into(),
            imo_number: Some("IMO9321483".into()),
            arrival_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            departure_date: None,
            status: None,
            total_tonnage: None,
        }
    }

    #[test]
    fn accepts_minimal_vessel() {
        assert!(checked(input()).is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        let mut bad = input();
        bad.name = "   ".into();
        assert_matches!(checked(bad), Err(ServiceError::InvalidInput(_)));
    }

    #[test]
    fn rejects_departure_before_arrival() {
        let mut bad = input();
        bad.departure_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_matches!(checked(bad), Err(ServiceError::InvalidInput(_)));
    }

    #[test]
    fn rejects_negative_tonnage() {
        let mut bad = input();
        bad.total_tonnage = Some(Decimal::NEGATIVE_ONE);
        assert_matches!(checked(bad), Err(ServiceError::InvalidInput(_)));
    }
}
