use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Links a vessel call to a client and the product loaded for it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "vessel_clients")]
#[schema(as = CargoAssignment)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vessel_id: i32,
    pub client_id: i32,
    pub product_id: i32,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub tonnage: Decimal,
    pub loading_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vessel::Entity",
        from = "Column::VesselId",
        to = "super::vessel::Column::Id",
        on_delete = "Cascade"
    )]
    Vessel,
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::vessel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vessel.def()
    }
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
