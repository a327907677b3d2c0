use anyhow::Context;
use clap::{Parser, Subcommand};
use migrations::{Migrator, MigratorTrait};
use tracing::info;

use shipping_ledger as ledger;

#[derive(Parser)]
#[command(name = "migration", about = "Manage the shipping ledger database schema", version)]
struct Cli {
    #[arg(long, help = "Database URL; defaults to the application configuration")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Apply every pending migration (default)
    Up,
    /// Roll back the most recent migration
    Down {
        #[arg(long, default_value_t = 1, help = "Number of migrations to roll back")]
        steps: u32,
    },
    /// Drop every table and re-apply all migrations
    Fresh,
    /// Print which migrations are applied
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = ledger::config::load_config().context("failed to load configuration")?;
    ledger::config::init_tracing(cfg.log_level(), cfg.log_json);
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }

    let db = ledger::db::establish_connection_from_app_config(&cfg)
        .await
        .context("database connection failed")?;

    match cli.command.unwrap_or(Command::Up) {
        Command::Up => {
            ledger::db::run_migrations(&db).await?;
        }
        Command::Down { steps } => {
            info!(steps, "Rolling back migrations");
            Migrator::down(&db, Some(steps)).await?;
        }
        Command::Fresh => {
            info!("Dropping all tables and re-applying migrations");
            Migrator::fresh(&db).await?;
        }
        Command::Status => {
            Migrator::status(&db).await?;
        }
    }

    ledger::db::close_pool(db).await?;
    Ok(())
}
