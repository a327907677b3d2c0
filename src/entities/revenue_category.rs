use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "revenue_categories")]
#[schema(as = RevenueCategory)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category_group: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::revenue::Entity")]
    Revenues,
}

impl Related<super::revenue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Revenues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
