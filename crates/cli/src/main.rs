//! Urban Threadz CLI - Database migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! ut-cli migrate
//!
//! # Check a catalog file without touching the database
//! ut-cli validate crates/storefront/data/catalog.json
//!
//! # Load a catalog file into the database
//! ut-cli seed crates/storefront/data/catalog.json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations (catalog tables and session table)
//! - `validate` - Report catalog consistency problems
//! - `seed` - Validate a catalog file and upsert it into `PostgreSQL`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ut-cli")]
#[command(author, version, about = "Urban Threadz CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Check a catalog file (JSON or YAML) for consistency problems
    Validate {
        /// Catalog file path
        file: PathBuf,
    },
    /// Validate a catalog file and load it into the database
    Seed {
        /// Catalog file path
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Validate { file } => {
            commands::validate::catalog(&file)?;
        }
        Commands::Seed { file } => commands::seed::catalog(&file).await?,
    }
    Ok(())
}
