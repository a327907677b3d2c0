use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_reference_tables::{
    ChargeCategories, ExpenseCategories, RevenueCategories,
};
use crate::m20240101_000002_create_vessel_tables::Vessels;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240101_000003_create_ledger_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Revenues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Revenues::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Revenues::VesselId).integer().not_null())
                    .col(ColumnDef::new(Revenues::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Revenues::Amount).decimal_len(15, 2).not_null())
                    .col(ColumnDef::new(Revenues::RevenueDate).date().not_null())
                    .col(ColumnDef::new(Revenues::Description).text().null())
                    .col(
                        ColumnDef::new(Revenues::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_revenues_vessel_id")
                            .from(Revenues::Table, Revenues::VesselId)
                            .to(Vessels::Table, Vessels::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_revenues_category_id")
                            .from(Revenues::Table, Revenues::CategoryId)
                            .to(RevenueCategories::Table, RevenueCategories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::VesselId).integer().not_null())
                    .col(ColumnDef::new(Expenses::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Expenses::Amount).decimal_len(15, 2).not_null())
                    .col(ColumnDef::new(Expenses::ExpenseDate).date().not_null())
                    .col(ColumnDef::new(Expenses::Description).text().null())
                    .col(
                        ColumnDef::new(Expenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_vessel_id")
                            .from(Expenses::Table, Expenses::VesselId)
                            .to(Vessels::Table, Vessels::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_category_id")
                            .from(Expenses::Table, Expenses::CategoryId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OperatingCharges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OperatingCharges::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OperatingCharges::CategoryId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OperatingCharges::Amount)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(OperatingCharges::Month).integer().not_null())
                    .col(ColumnDef::new(OperatingCharges::Year).integer().not_null())
                    .col(ColumnDef::new(OperatingCharges::Description).text().null())
                    .col(
                        ColumnDef::new(OperatingCharges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OperatingCharges::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_operating_charges_category_id")
                            .from(OperatingCharges::Table, OperatingCharges::CategoryId)
                            .to(ChargeCategories::Table, ChargeCategories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One charge per category and month; upserts conflict on this index.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_operating_charges_category_period")
                    .table(OperatingCharges::Table)
                    .col(OperatingCharges::CategoryId)
                    .col(OperatingCharges::Month)
                    .col(OperatingCharges::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_revenues_vessel_id")
                    .table(Revenues::Table)
                    .col(Revenues::VesselId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_expenses_vessel_id")
                    .table(Expenses::Table)
                    .col(Expenses::VesselId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OperatingCharges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Revenues::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Revenues {
    Table,
    Id,
    VesselId,
    CategoryId,
    Amount,
    RevenueDate,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    VesselId,
    CategoryId,
    Amount,
    ExpenseDate,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OperatingCharges {
    Table,
    Id,
    CategoryId,
    Amount,
    Month,
    Year,
    Description,
    CreatedAt,
    UpdatedAt,
}
