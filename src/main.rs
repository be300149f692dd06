//! # Employee Directory Main Entry Point
//!
//! Serves the employee API, applies migrations, or prints the directory view.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use employee_directory::{
    client::{DirectoryClient, DirectoryView},
    config::{AppConfig, ConfigLoader},
    db, server, telemetry,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Employee directory service and client.
#[derive(Parser, Debug)]
#[command(name = "employee-directory", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect to the database, apply migrations, and serve the API (default).
    Serve,
    /// Apply pending migrations and exit.
    Migrate,
    /// Fetch active employees from the API and print the directory.
    Directory {
        /// Also print the details of this employee
        #[arg(long)]
        select: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from layered env files and variables
    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;
    telemetry::init_tracing(&config).context("initializing telemetry")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Migrate => migrate(&config).await,
        Commands::Directory { select } => directory(&config, select).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Configuration");
    }

    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;
    db::run_migrations(&db).await?;

    server::run_server(config, db).await
}

async fn migrate(config: &AppConfig) -> Result<()> {
    let db = db::init_pool(config)
        .await
        .context("initializing database connection pool")?;
    db::run_migrations(&db).await
}

async fn directory(config: &AppConfig, select: Option<Uuid>) -> Result<()> {
    let client = DirectoryClient::from_config(config).context("building directory client")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut view = DirectoryView::new();
    if !view.load(&client, &cancel).await {
        return Ok(());
    }

    if let Some(id) = select
        && !view.select(id)
    {
        tracing::warn!(employee_id = %id, "Employee is not in the directory");
    }

    print!("{}", view.render());
    Ok(())
}
