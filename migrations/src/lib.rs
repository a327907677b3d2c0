pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_reference_tables;
mod m20240101_000002_create_vessel_tables;
mod m20240101_000003_create_ledger_tables;
mod m20240101_000004_seed_categories;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_reference_tables::Migration),
            Box::new(m20240101_000002_create_vessel_tables::Migration),
            Box::new(m20240101_000003_create_ledger_tables::Migration),
            Box::new(m20240101_000004_seed_categories::Migration),
        ]
    }
}
