use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "revenues")]
#[schema(as = Revenue)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vessel_id: i32,
    pub category_id: i32,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    pub revenue_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vessel::Entity",
        from = "Column::VesselId",
        to = "super::vessel::Column::Id"
    )]
    Vessel,
    #[sea_orm(
        belongs_to = "super::revenue_category::Entity",
        from = "Column::CategoryId",
        to = "super::revenue_category::Column::Id"
    )]
    Category,
}

impl Related<super::vessel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vessel.def()
    }
}

impl Related<super::revenue_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
