//! Genre repository

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{DbError, Query, QueryExecutor};
use crate::models::Listing;

/// Genre name row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GenreName {
    pub nombre: String,
}

/// Genre repository
pub struct GenreRepo<'a> {
    db: &'a QueryExecutor,
}

impl<'a> GenreRepo<'a> {
    pub fn new(db: &'a QueryExecutor) -> Self {
        Self { db }
    }

    /// All genre names with the table total.
    pub async fn list(&self) -> Result<Listing<GenreName>, DbError> {
        let data = self
            .db
            .fetch_all(&Query::new("SELECT nombre FROM genero ORDER BY nombre"))
            .await?;
        let total_records = self
            .db
            .fetch_count(&Query::new("SELECT COUNT(*) FROM genero"))
            .await?;

        Ok(Listing {
            total_records,
            data,
        })
    }

    pub async fn get(&self, id_genero: i64) -> Result<Option<GenreName>, DbError> {
        let query = Query::new("SELECT nombre FROM genero WHERE id_genero = @id_genero")
            .bind("id_genero", id_genero);
        self.db.fetch_optional(&query).await
    }

    pub async fn exists(&self, id_genero: i64) -> Result<bool, DbError> {
        let query = Query::new("SELECT COUNT(*) FROM genero WHERE id_genero = @id_genero")
            .bind("id_genero", id_genero);
        Ok(self.db.fetch_count(&query).await? > 0)
    }
}
