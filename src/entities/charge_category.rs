use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "charge_categories")]
#[schema(as = ChargeCategory)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::operating_charge::Entity")]
    OperatingCharges,
}

impl Related<super::operating_charge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OperatingCharges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
