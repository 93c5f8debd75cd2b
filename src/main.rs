//! AccTrack Backend
//!
//! Bootstraps configuration, logging and the database, then runs one command:
//! - `migrate` applies the schema and exits
//! - `summary <email>` prints the account's ledger totals as JSON
//! - `export <email>` writes the account's ledger as CSV to stdout
//!
//! Commands that act on an account read its password from `ACCTRACK_PASSWORD`.

use acctrack_backend::database::{create_pool, run_migrations};
use acctrack_backend::{AppConfig, AppState, PasswordHasher};
use anyhow::{bail, Context};
use std::io::Write;
use tracing::{error, info};

const USAGE: &str = "usage: acctrack-backend <migrate | summary <email> | export <email>>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!(e)
    })?;

    // Initialize tracing/logging with config
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("acctrack_backend={},sqlx=warn", config.log_level).into()
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Environment: {}", config.environment);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("migrate");

    // =========================================================================
    // DATABASE SETUP
    // =========================================================================
    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        e
    })?;
    info!("Connected to {}", config.database_url());

    run_migrations(&pool).await.map_err(|e| {
        error!("Database migration failed: {}", e);
        e
    })?;
    info!("Database migrations completed successfully");

    if command == "migrate" {
        return Ok(());
    }

    let email = match (command, args.get(1)) {
        ("summary" | "export", Some(email)) => email.clone(),
        _ => bail!(USAGE),
    };
    let password = std::env::var("ACCTRACK_PASSWORD")
        .context("ACCTRACK_PASSWORD must be set for account commands")?;

    let hasher = PasswordHasher::new(&config.password)?;
    let state = AppState::new(pool, hasher);
    let ctx = state
        .accounts
        .authenticate(&email, &password)
        .await
        .map_err(|e| anyhow::anyhow!(e.public_message()))?;

    let mut stdout = std::io::stdout().lock();
    match command {
        "summary" => {
            let summary = state.ledger.summary(&ctx).await?;
            serde_json::to_writer_pretty(&mut stdout, &summary)?;
            writeln!(stdout)?;
        }
        "export" => {
            let csv = state.ledger.export_csv(&ctx).await?;
            stdout.write_all(&csv)?;
        }
        _ => bail!(USAGE),
    }
    stdout.flush()?;

    Ok(())
}
