//! CLI for bulk credential provisioning
//!
//! Reads an `email,password` CSV (header row first) and either writes a
//! hashed copy or upserts the hashes straight into the credentials table.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use membership_core::domains::auth::models::Credential;
use membership_core::domains::auth::{parse_credential_rows, CredentialRow};
use membership_core::domains::auth::password::hash_password;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[derive(Parser)]
#[command(name = "credentials_cli")]
#[command(about = "Hash and import member credentials from CSV")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash passwords into a new CSV (email,password_hash)
    Hash {
        input: PathBuf,
        #[arg(short, long, default_value = "output.csv")]
        output: PathBuf,
    },

    /// Hash passwords and upsert them into the database
    Import { input: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Hash { input, output } => hash_to_csv(&input, &output),
        Commands::Import { input } => import_to_database(&input).await,
    }
}

fn read_rows(input: &Path) -> Result<Vec<CredentialRow>> {
    let contents = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    Ok(parse_credential_rows(&contents))
}

fn hash_to_csv(input: &Path, output: &Path) -> Result<()> {
    let rows = read_rows(input)?;

    let mut lines = vec!["email,password_hash".to_string()];
    for row in rows {
        let hash = hash_password(&row.password)?;
        lines.push(format!("{},{}", row.email, hash));
        info!(email = %row.email, "Processed");
    }

    fs::write(output, lines.join("\n"))
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(count = lines.len() - 1, path = %output.display(), "All rows written");

    Ok(())
}

async fn import_to_database(input: &Path) -> Result<()> {
    let rows = read_rows(input)?;

    // Only the database is needed here, not the full server config
    let _ = dotenvy::dotenv();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    for row in &rows {
        let hash = hash_password(&row.password)?;
        Credential::upsert(&row.email, &hash, &pool).await?;
        info!(email = %row.email, "Inserted/updated");
    }

    info!(count = rows.len(), "All rows processed");
    pool.close().await;

    Ok(())
}
