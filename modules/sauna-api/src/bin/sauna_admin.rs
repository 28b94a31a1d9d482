//! Catalog maintenance against Postgres directly.
//!
//! Migrations are embedded at compile time. The seed file defaults to the
//! repository's `data/seed-data.json`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Weekday;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use sauna_api::admin::{seed_catalog, set_day_hours, SeedOutcome};
use sauna_common::config;
use sauna_common::NewSauna;
use sauna_store::{PgSaunaStore, SaunaStore};

const DEFAULT_SEED_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/seed-data.json");

#[derive(Parser)]
#[command(name = "sauna-admin")]
#[command(about = "Manage the sauna catalog")]
#[command(version)]
struct Cli {
    /// Postgres connection string (defaults to DATABASE_URL)
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Load the seed catalog into an empty table
    Seed {
        /// Seed file (JSON array of saunas)
        #[arg(long, default_value = DEFAULT_SEED_FILE)]
        file: PathBuf,
    },

    /// Print every sauna with its slug
    List,

    /// Replace one day's opening hours
    SetHours {
        /// Sauna id
        id: Uuid,
        /// Weekday, e.g. monday or mon
        day: Weekday,
        /// `HH:MM-HH:MM` or `closed`
        hours: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<()> {
    let database_url = match cli.database_url {
        Some(url) => url,
        None => config::database_url()?,
    };
    let store = PgSaunaStore::connect(&database_url)
        .await
        .context("Failed to connect to Postgres")?;

    match cli.command {
        Commands::Migrate => store.migrate().await.context("Migration failed"),
        Commands::Seed { file } => seed(&store, &file).await,
        Commands::List => list(&store).await,
        Commands::SetHours { id, day, hours } => set_hours(&store, id, day, &hours).await,
    }
}

async fn seed(store: &PgSaunaStore, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Seed file not found: {}", file.display()))?;
    let saunas: Vec<NewSauna> = serde_json::from_str(&raw)
        .with_context(|| format!("Seed file is not a list of saunas: {}", file.display()))?;
    info!(count = saunas.len(), "Loaded seed file");

    match seed_catalog(store, saunas).await.context("Seeding failed")? {
        SeedOutcome::AlreadySeeded => {
            println!("Database already contains sauna data; not seeding.");
            println!("Clear the saunas table first if you want to reseed.");
        }
        SeedOutcome::Seeded(stored) => {
            println!("Seeded {} saunas:", stored.len());
            for sauna in &stored {
                println!("  - {}", sauna.name);
            }
        }
    }
    Ok(())
}

async fn list(store: &PgSaunaStore) -> Result<()> {
    for sauna in store.list_all().await? {
        println!("{}  {:<32}  {}", sauna.id, sauna.slug(), sauna.name);
    }
    Ok(())
}

async fn set_hours(store: &PgSaunaStore, id: Uuid, day: Weekday, hours: &str) -> Result<()> {
    let updated = set_day_hours(store, id, day, hours)
        .await
        .with_context(|| format!("Could not update hours for {id}"))?;
    println!("{}", updated.opening_hours.format_weekly());
    Ok(())
}
