//! Director repository

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{DbError, Query, QueryExecutor};
use crate::models::Listing;

/// Director row for the full listing
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Director {
    pub id_director: i32,
    pub nombre: String,
    pub biografia: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
}

/// Director row for the by-id lookup
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DirectorProfile {
    pub nombre: String,
    pub biografia: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
}

/// Director repository
pub struct DirectorRepo<'a> {
    db: &'a QueryExecutor,
}

impl<'a> DirectorRepo<'a> {
    pub fn new(db: &'a QueryExecutor) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Listing<Director>, DbError> {
        let data = self
            .db
            .fetch_all(&Query::new(
                r#"
                SELECT id_director, nombre, biografia, fecha_nacimiento
                FROM director
                ORDER BY id_director
                "#,
            ))
            .await?;
        let total_records = self
            .db
            .fetch_count(&Query::new("SELECT COUNT(*) FROM director"))
            .await?;

        Ok(Listing {
            total_records,
            data,
        })
    }

    /// Look up one director. A missing id is `Ok(None)`, not an error.
    pub async fn get(&self, id_director: i64) -> Result<Option<DirectorProfile>, DbError> {
        let query = Query::new(
            r#"
            SELECT nombre, biografia, fecha_nacimiento
            FROM director
            WHERE id_director = @id_director
            "#,
        )
        .bind("id_director", id_director);

        self.db.fetch_optional(&query).await
    }
}
