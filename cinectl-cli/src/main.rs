//! cinectl CLI - movie catalog server and maintenance tooling
//!
//! This is the main entry point for the cinectl command-line tool, which provides:
//! - The catalog HTTP API (`serve` subcommand)
//! - Password migration for legacy plain-text rows (`rehash-passwords` subcommand)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::CinectlConfig;

#[derive(Parser, Debug)]
#[command(
    name = "cinectl",
    author,
    version,
    about = "Movie catalog API over PostgreSQL",
    long_about = "Serve movies, genres, directors, users and favorites over HTTP, \
                  with a lazily connected pool that retries while the database is down."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.cinectl/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Hash any plain-text passwords left in the usuario table
    RehashPasswords(commands::rehash::RehashArgs),
}

/// Load `.env` from the working directory, then `~/.cinectl/.env`.
///
/// Variables already set in the environment are never overwritten.
fn load_dotenv() {
    dotenvy::dotenv().ok();
    if let Some(home) = dirs::home_dir() {
        dotenvy::from_path(home.join(".cinectl/.env")).ok();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();
    load_dotenv();

    let config = CinectlConfig::load(cli.config.as_deref())?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, &config).await?,
        Commands::RehashPasswords(args) => commands::run_rehash(args, &config).await?,
    }

    Ok(())
}
