//! Favorite repository
//!
//! Duplicates are rejected by the `(id_usuario, id_pelicula)` unique index,
//! not by a check-then-insert.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{DbError, Query, QueryExecutor};
use crate::models::NewFavorite;

/// A favorite movie with its director
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FavoriteMovie {
    pub nombre: String,
    pub imagen: Option<String>,
    pub director: String,
}

/// Favorite repository
pub struct FavoriteRepo<'a> {
    db: &'a QueryExecutor,
}

impl<'a> FavoriteRepo<'a> {
    pub fn new(db: &'a QueryExecutor) -> Self {
        Self { db }
    }

    /// Add a favorite.
    ///
    /// # Errors
    ///
    /// `DbError::Conflict { kind: ConflictKind::DuplicateFavorite, .. }` when
    /// the pair already exists.
    pub async fn add(&self, favorite: NewFavorite) -> Result<(), DbError> {
        let query = Query::new(
            r#"
            INSERT INTO favorita_pelicula (id_usuario, id_pelicula)
            VALUES (@id_usuario, @id_pelicula)
            "#,
        )
        .bind("id_usuario", favorite.id_usuario)
        .bind("id_pelicula", favorite.id_pelicula);

        self.db.execute(&query).await?;
        Ok(())
    }

    pub async fn list_for_user(&self, id_usuario: i64) -> Result<Vec<FavoriteMovie>, DbError> {
        let query = Query::new(
            r#"
            SELECT
                pelicula.nombre,
                pelicula.imagen,
                director.nombre AS director
            FROM favorita_pelicula
            JOIN pelicula ON favorita_pelicula.id_pelicula = pelicula.id_pelicula
            JOIN director ON pelicula.id_director = director.id_director
            WHERE favorita_pelicula.id_usuario = @id_usuario
            ORDER BY pelicula.nombre
            "#,
        )
        .bind("id_usuario", id_usuario);

        self.db.fetch_all(&query).await
    }
}
