//! cinectl configuration
//!
//! Precedence, lowest first: built-in defaults, `~/.cinectl/config.toml`
//! (or `--config PATH`), environment variables (after `.env` is loaded),
//! then per-command flags.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use cinectl_server::{PoolConfig, ServerConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CinectlConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        let server = ServerConfig::default();
        Self {
            bind: server.bind_addr,
            cors_permissive: server.cors_permissive,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub retry_delay_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let pool = PoolConfig::default();
        Self {
            url: None,
            max_connections: pool.max_connections,
            min_connections: pool.min_connections,
            idle_timeout_secs: pool.idle_timeout.as_secs(),
            acquire_timeout_secs: pool.acquire_timeout.as_secs(),
            retry_delay_secs: pool.retry_delay.as_secs(),
        }
    }
}

impl fmt::Debug for DatabaseSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSection")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .finish()
    }
}

impl CinectlConfig {
    /// Get config file path: ~/.cinectl/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cinectl/config.toml")
    }

    /// Load the file layer, then apply process environment overrides.
    ///
    /// A missing default file means defaults; a missing explicit path is an
    /// error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "No config file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).context("Failed to parse config file (invalid TOML)")
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(bind) = parsed(&lookup, "CINECTL_BIND")? {
            self.server.bind = bind;
        }
        if let Some(max) = parsed(&lookup, "DB_MAX_CONNECTIONS")? {
            self.database.max_connections = max;
        }
        if let Some(min) = parsed(&lookup, "DB_MIN_CONNECTIONS")? {
            self.database.min_connections = min;
        }
        if let Some(secs) = parsed(&lookup, "DB_IDLE_TIMEOUT_SECS")? {
            self.database.idle_timeout_secs = secs;
        }
        Ok(())
    }

    /// Pool settings, with `url_override` taking precedence over every
    /// other source.
    pub fn pool_config(&self, url_override: Option<String>) -> Result<PoolConfig> {
        let database_url = url_override
            .or_else(|| self.database.url.clone())
            .context(
                "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.cinectl/config.toml",
            )?;

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        Ok(PoolConfig {
            database_url,
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            idle_timeout: Duration::from_secs(self.database.idle_timeout_secs),
            acquire_timeout: Duration::from_secs(self.database.acquire_timeout_secs),
            retry_delay: Duration::from_secs(self.database.retry_delay_secs),
        })
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}
