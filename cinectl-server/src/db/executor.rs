//! Query execution over the shared pool
//!
//! Every repository call funnels through here: acquire the pool, compile
//! the named template, bind, run, classify failures. Templates are
//! compiled before the pool is touched, so a malformed query never
//! costs a connection.

use sqlx::postgres::PgRow;
use sqlx::FromRow;
use tracing::{debug, error, warn, Instrument};

use super::query::{CompiledQuery, Query};
use super::{ConnectionPool, DbError};
use crate::models::{PageRequest, PageResult};

/// Runs [`Query`] values against the pool
#[derive(Clone)]
pub struct QueryExecutor {
    pool: ConnectionPool,
}

impl QueryExecutor {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Fetch every row, decoded as `T`.
    pub async fn fetch_all<T>(&self, query: &Query) -> Result<Vec<T>, DbError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let compiled = query.compile()?;
        let pool = self.pool.get().await?;

        sqlx::query_as_with::<_, T, _>(&compiled.sql, compiled.arguments()?)
            .fetch_all(&pool)
            .instrument(span(&compiled))
            .await
            .map_err(|e| report(&compiled, e))
    }

    /// Fetch at most one row.
    pub async fn fetch_optional<T>(&self, query: &Query) -> Result<Option<T>, DbError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let compiled = query.compile()?;
        let pool = self.pool.get().await?;

        sqlx::query_as_with::<_, T, _>(&compiled.sql, compiled.arguments()?)
            .fetch_optional(&pool)
            .instrument(span(&compiled))
            .await
            .map_err(|e| report(&compiled, e))
    }

    /// Run a `SELECT COUNT(*) ...` query.
    pub async fn fetch_count(&self, query: &Query) -> Result<i64, DbError> {
        let compiled = query.compile()?;
        let pool = self.pool.get().await?;

        sqlx::query_scalar_with::<_, i64, _>(&compiled.sql, compiled.arguments()?)
            .fetch_one(&pool)
            .instrument(span(&compiled))
            .await
            .map_err(|e| report(&compiled, e))
    }

    /// Run a single write statement, returning the affected row count.
    pub async fn execute(&self, query: &Query) -> Result<u64, DbError> {
        let compiled = query.compile()?;
        let pool = self.pool.get().await?;

        let result = sqlx::query_with(&compiled.sql, compiled.arguments()?)
            .execute(&pool)
            .instrument(span(&compiled))
            .await
            .map_err(|e| report(&compiled, e))?;

        Ok(result.rows_affected())
    }

    /// Fetch one page of `select` and the total from `count`.
    ///
    /// `select` must end in `LIMIT @limit OFFSET @offset`; the window is
    /// bound here. The two statements run independently, so under
    /// concurrent writes the total may disagree with the page.
    pub async fn fetch_page<T>(
        &self,
        select: Query,
        count: &Query,
        page: PageRequest,
    ) -> Result<PageResult<T>, DbError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let rows = self.fetch_all(&select.paged(page)).await?;
        let total = self.fetch_count(count).await?;
        Ok(page.into_result(rows, total))
    }
}

fn span(compiled: &CompiledQuery) -> tracing::Span {
    tracing::debug_span!("db.query", sql = %compiled.sql, binds = compiled.values.len())
}

/// Classify a driver failure and log it with the statement that caused it.
fn report(compiled: &CompiledQuery, err: sqlx::Error) -> DbError {
    let err = DbError::from(err);
    match &err {
        DbError::Conflict { kind, constraint } => {
            debug!(%kind, constraint = ?constraint, "Unique constraint rejected write");
        }
        DbError::Connection { reason, .. } => {
            warn!(%reason, sql = %compiled.sql, "Database connection lost during query");
        }
        _ => {
            error!(error = %err, sql = %compiled.sql, "Query failed");
        }
    }
    err
}
