//! Replace plain-text passwords in `usuario` with Argon2 digests
//!
//! Rows that already hold a digest are left alone, so the command can be
//! re-run safely.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cinectl_server::auth::is_digest;
use cinectl_server::db::repos::UserRepo;
use cinectl_server::{Argon2Hasher, ConnectionPool, PasswordHasher, QueryExecutor};

use crate::config::CinectlConfig;

/// Arguments for the rehash-passwords command
#[derive(Parser, Debug)]
pub struct RehashArgs {
    /// Report which users would be updated without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Outcome counts for one run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RehashSummary {
    pub hashed: usize,
    pub skipped: usize,
}

pub async fn run_rehash(args: RehashArgs, config: &CinectlConfig) -> Result<()> {
    let pool = ConnectionPool::new(config.pool_config(args.database_url)?);
    let db = QueryExecutor::new(pool.clone());

    let result = rehash_all(&db, Arc::new(Argon2Hasher::new()), args.dry_run).await;
    pool.close().await;
    let summary = result?;

    if args.dry_run {
        println!(
            "{} password(s) would be hashed, {} already hashed",
            summary.hashed, summary.skipped
        );
    } else {
        println!(
            "{} password(s) hashed, {} already hashed",
            summary.hashed, summary.skipped
        );
    }
    Ok(())
}

async fn rehash_all(
    db: &QueryExecutor,
    hasher: Arc<dyn PasswordHasher>,
    dry_run: bool,
) -> Result<RehashSummary> {
    let users = UserRepo::new(db);
    let rows = users
        .all_credentials()
        .await
        .context("Failed to read users")?;

    let mut summary = RehashSummary::default();
    for row in rows {
        if is_digest(&row.contrasena) {
            summary.skipped += 1;
            continue;
        }

        if dry_run {
            tracing::info!(id_usuario = row.id_usuario, "Would hash password");
        } else {
            let digest = hash_blocking(Arc::clone(&hasher), row.contrasena).await?;
            users
                .set_password(row.id_usuario, &digest)
                .await
                .with_context(|| format!("Failed to update user {}", row.id_usuario))?;
            tracing::info!(id_usuario = row.id_usuario, "Password hashed");
        }
        summary.hashed += 1;
    }

    Ok(summary)
}

/// Run one hash on the blocking pool so the runtime keeps serving the pool.
async fn hash_blocking(hasher: Arc<dyn PasswordHasher>, secret: String) -> Result<String> {
    let digest = tokio::task::spawn_blocking(move || hasher.hash(&secret))
        .await
        .context("Hashing task failed")??;
    Ok(digest)
}
