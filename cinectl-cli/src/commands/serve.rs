//! HTTP server command for the movie catalog API

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use cinectl_server::{run_server, AppState, ConnectionPool, ServerConfig};

use crate::config::CinectlConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config; default 127.0.0.1:3000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// The database is not contacted here; the first request that needs it
/// opens the pool.
pub async fn run_serve(args: ServeArgs, config: &CinectlConfig) -> Result<()> {
    let pool_config = config.pool_config(args.database_url)?;
    let server = ServerConfig {
        bind_addr: args.bind.unwrap_or(config.server.bind),
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
    };

    tracing::info!(
        bind = %server.bind_addr,
        pool = ?pool_config,
        "Starting cinectl server"
    );

    let pool = ConnectionPool::new(pool_config);
    run_server(AppState::new(pool), server)
        .await
        .context("Server error")?;

    Ok(())
}
