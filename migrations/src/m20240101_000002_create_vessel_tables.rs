use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_reference_tables::{Clients, Products};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240101_000002_create_vessel_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vessels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vessels::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vessels::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Vessels::ImoNumber).string_len(20).null())
                    .col(ColumnDef::new(Vessels::ArrivalDate).date().not_null())
                    .col(ColumnDef::new(Vessels::DepartureDate).date().null())
                    .col(
                        ColumnDef::new(Vessels::Status)
                            .string_len(20)
                            .not_null()
                            .default("in_progress"),
                    )
                    .col(
                        ColumnDef::new(Vessels::TotalTonnage)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Vessels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vessels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_vessels_arrival_date")
                    .table(Vessels::Table)
                    .col(Vessels::ArrivalDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VesselClients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VesselClients::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VesselClients::VesselId).integer().not_null())
                    .col(ColumnDef::new(VesselClients::ClientId).integer().not_null())
                    .col(ColumnDef::new(VesselClients::ProductId).integer().not_null())
                    .col(
                        ColumnDef::new(VesselClients::Tonnage)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(VesselClients::LoadingDate).date().null())
                    .col(
                        ColumnDef::new(VesselClients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vessel_clients_vessel_id")
                            .from(VesselClients::Table, VesselClients::VesselId)
                            .to(Vessels::Table, Vessels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vessel_clients_client_id")
                            .from(VesselClients::Table, VesselClients::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vessel_clients_product_id")
                            .from(VesselClients::Table, VesselClients::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_vessel_clients_vessel_id")
                    .table(VesselClients::Table)
                    .col(VesselClients::VesselId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VesselClients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vessels::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Vessels {
    Table,
    Id,
    Name,
    ImoNumber,
    ArrivalDate,
    DepartureDate,
    Status,
    TotalTonnage,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum VesselClients {
    Table,
    Id,
    VesselId,
    ClientId,
    ProductId,
    Tonnage,
    LoadingDate,
    CreatedAt,
}
