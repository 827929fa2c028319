//! # Rentals Main Entry Point

use anyhow::Context;
use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use rentals::{admin, config::ConfigLoader, db, server::run_server, telemetry};

/// Records service for rental properties, units, tenants and leases.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default).
    Serve {
        /// Do not apply pending migrations on startup.
        #[arg(long)]
        skip_migrations: bool,
    },
    /// Manage the database schema.
    Migrate {
        #[command(subcommand)]
        action: Option<MigrateAction>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Apply all pending migrations (default).
    Up,
    /// Roll back the most recent migration.
    Down,
    /// Show applied and pending migrations.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;
    telemetry::init_tracing(&config)?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;

    match cli.command.unwrap_or(Commands::Serve {
        skip_migrations: false,
    }) {
        Commands::Serve { skip_migrations } => {
            if skip_migrations {
                tracing::warn!("Skipping database migrations");
            } else {
                db::run_migrations(&db).await?;
            }

            let site = admin::default_site().context("building admin registry")?;
            run_server(config, db, site).await
        }
        Commands::Migrate { action } => {
            match action.unwrap_or(MigrateAction::Up) {
                MigrateAction::Up => db::run_migrations(&db).await?,
                MigrateAction::Down => Migrator::down(&db, Some(1))
                    .await
                    .context("rolling back migration")?,
                MigrateAction::Status => Migrator::status(&db)
                    .await
                    .context("reading migration status")?,
            }
            Ok(())
        }
    }
}
