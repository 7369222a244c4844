//! Database connection pool management
//!
//! One `PgPool` per process, created lazily on first use and shared by
//! handle. Initialization is guarded by a `OnceCell`, so concurrent callers
//! await the same in-flight attempt. A failed attempt schedules the next one
//! `retry_delay` later; until then callers fail fast with
//! [`DbError::Connection`] and no new connection is opened.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;
use tracing::{error, info};

use super::DbError;

/// Pool limits and reconnect schedule
#[derive(Clone)]
pub struct PoolConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Idle connections are closed after this long
    pub idle_timeout: Duration,
    /// How long a caller waits for a free connection
    pub acquire_timeout: Duration,
    /// Delay between failed connect attempts
    pub retry_delay: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: 20,
            min_connections: 0,
            idle_timeout: Duration::from_secs(30),
            acquire_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("idle_timeout", &self.idle_timeout)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

/// Opens the physical pool.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, config: &PoolConfig) -> Result<PgPool, sqlx::Error>;
}

/// Connects to PostgreSQL with `PgPoolOptions`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self, config: &PoolConfig) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .idle_timeout(Some(config.idle_timeout))
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await
    }
}

/// Lazily-initialized shared pool handle. Cloning shares the same pool.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    config: PoolConfig,
    connector: Box<dyn Connector>,
    pool: OnceCell<PgPool>,
    /// Earliest instant the next connect attempt may start
    retry_at: Mutex<Option<Instant>>,
    attempts: AtomicU64,
}

impl ConnectionPool {
    /// Create a handle that connects with [`PgConnector`] on first use.
    pub fn new(config: PoolConfig) -> Self {
        Self::with_connector(config, PgConnector)
    }

    pub fn with_connector(config: PoolConfig, connector: impl Connector) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                config,
                connector: Box::new(connector),
                pool: OnceCell::new(),
                retry_at: Mutex::new(None),
                attempts: AtomicU64::new(0),
            }),
        }
    }

    /// Get the pool, connecting if this is the first successful call.
    ///
    /// # Errors
    ///
    /// [`DbError::Connection`] while the database is unreachable. The
    /// error carries `retry_in` until the scheduled retry is due.
    pub async fn get(&self) -> Result<PgPool, DbError> {
        if let Some(pool) = self.inner.pool.get() {
            return Ok(pool.clone());
        }

        self.inner
            .pool
            .get_or_try_init(|| self.inner.attempt())
            .await
            .cloned()
    }

    /// Whether a pool has been established.
    pub fn is_ready(&self) -> bool {
        self.inner.pool.initialized()
    }

    /// Number of connect attempts made so far.
    pub fn connect_attempts(&self) -> u64 {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Close the pool if one was established. Used at shutdown.
    pub async fn close(&self) {
        if let Some(pool) = self.inner.pool.get() {
            pool.close().await;
            info!("Database pool closed");
        }
    }
}

impl PoolInner {
    async fn attempt(&self) -> Result<PgPool, DbError> {
        let mut retry_at = self.retry_at.lock().await;

        if let Some(at) = *retry_at {
            let now = Instant::now();
            if now < at {
                return Err(DbError::Connection {
                    reason: "database unreachable, reconnect scheduled".to_owned(),
                    retry_in: Some(at - now),
                });
            }
        }

        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        match self.connector.connect(&self.config).await {
            Ok(pool) => {
                *retry_at = None;
                info!(
                    attempt,
                    max_connections = self.config.max_connections,
                    min_connections = self.config.min_connections,
                    "Connected to database"
                );
                Ok(pool)
            }
            Err(err) => {
                *retry_at = Some(Instant::now() + self.config.retry_delay);
                error!(
                    attempt,
                    error = %err,
                    retry_in_secs = self.config.retry_delay.as_secs(),
                    "Database connection failed, retry scheduled"
                );
                Err(DbError::Connection {
                    reason: err.to_string(),
                    retry_in: Some(self.config.retry_delay),
                })
            }
        }
    }
}
