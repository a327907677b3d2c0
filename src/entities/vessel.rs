use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single vessel call, attributed to reporting periods by its arrival date.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "vessels")]
#[schema(as = Vessel)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub imo_number: Option<String>,
    pub arrival_date: NaiveDate,
    pub departure_date: Option<NaiveDate>,
    pub status: VesselStatus,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub total_tonnage: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum VesselStatus {
    #[default]
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::revenue::Entity")]
    Revenues,
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::cargo_assignment::Entity")]
    CargoAssignments,
}

impl Related<super::revenue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Revenues.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::cargo_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CargoAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
