use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_reference_tables::{
    ChargeCategories, ExpenseCategories, RevenueCategories,
};

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240101_000004_seed_categories"
    }
}

/// (name, group)
const REVENUE_CATEGORIES: &[(&str, &str)] = &[
    ("Consignation", "Agence"),
    ("Frais d'agence", "Agence"),
    ("Manutention", "Opérations"),
    ("Acconage", "Opérations"),
    ("Transit", "Logistique"),
    ("Magasinage", "Logistique"),
];

/// (name, code)
const EXPENSE_CATEGORIES: &[(&str, &str)] = &[
    ("Droits de port", "PORT"),
    ("Pilotage", "PILOT"),
    ("Remorquage", "REMORQ"),
    ("Main d'oeuvre dockers", "DOCKERS"),
    ("Location d'engins", "ENGINS"),
    ("Frais divers", "DIVERS"),
];

/// (name, code)
const CHARGE_CATEGORIES: &[(&str, &str)] = &[
    ("Salaires", "SALAIRES"),
    ("Loyer", "LOYER"),
    ("Électricité et eau", "ENERGIE"),
    ("Télécommunications", "TELECOM"),
    ("Carburant", "CARBURANT"),
    ("Fournitures de bureau", "FOURNITURES"),
];

fn insert_pairs<T>(
    table: T,
    first: T,
    second: T,
    rows: &[(&str, &str)],
) -> Result<InsertStatement, DbErr>
where
    T: Iden + 'static,
{
    let mut insert = Query::insert();
    insert.into_table(table).columns([first, second]);
    for (a, b) in rows {
        insert
            .values([(*a).into(), (*b).into()])
            .map_err(|e| DbErr::Custom(e.to_string()))?;
    }
    Ok(insert)
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(insert_pairs(
                RevenueCategories::Table,
                RevenueCategories::Name,
                RevenueCategories::CategoryGroup,
                REVENUE_CATEGORIES,
            )?)
            .await?;
        manager
            .exec_stmt(insert_pairs(
                ExpenseCategories::Table,
                ExpenseCategories::Name,
                ExpenseCategories::Code,
                EXPENSE_CATEGORIES,
            )?)
            .await?;
        manager
            .exec_stmt(insert_pairs(
                ChargeCategories::Table,
                ChargeCategories::Name,
                ChargeCategories::Code,
                CHARGE_CATEGORIES,
            )?)
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(ChargeCategories::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(ExpenseCategories::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(RevenueCategories::Table).to_owned())
            .await
    }
}
