//! Movie repository
//!
//! Listing, lookup by id, top played and fuzzy search over `pelicula`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::search::build_search;
use crate::db::{DbError, Query, QueryExecutor};
use crate::models::{PageRequest, PageResult, SearchTerm};

/// Number of movies in the most-played ranking
pub const TOP_PLAYED: i64 = 10;

/// Row for the basic listing
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MovieSummary {
    pub nombre: String,
    pub imagen: Option<String>,
    pub clasificacion: Option<String>,
}

/// Row for the by-genre listing
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GenreMovie {
    pub id_pelicula: i32,
    pub nombre: String,
    pub imagen: Option<String>,
    pub clasificacion: Option<String>,
}

/// Full movie record with genre and director names resolved
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MovieDetail {
    pub nombre: String,
    pub sinopsis: Option<String>,
    pub imagen: Option<String>,
    pub trailer: Option<String>,
    pub genero: String,
    pub duracion: Option<i32>,
    pub clasificacion: Option<String>,
    pub director: String,
    pub anio: Option<i32>,
}

/// Detail plus play count, for the ranking
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TopMovie {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub detail: MovieDetail,
    pub reproducciones: Option<i32>,
}

/// Search result row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SearchHit {
    pub nombre: String,
    pub imagen: Option<String>,
    pub clasificacion: Option<String>,
    pub genero: String,
    pub director: String,
}

/// Movie repository
pub struct MovieRepo<'a> {
    db: &'a QueryExecutor,
}

impl<'a> MovieRepo<'a> {
    pub fn new(db: &'a QueryExecutor) -> Self {
        Self { db }
    }

    /// Page through all movies ordered by title.
    pub async fn list(&self, page: PageRequest) -> Result<PageResult<MovieSummary>, DbError> {
        let select = Query::new(
            r#"
            SELECT nombre, imagen, clasificacion
            FROM pelicula
            ORDER BY nombre
            LIMIT @limit OFFSET @offset
            "#,
        );
        let count = Query::new("SELECT COUNT(*) FROM pelicula");

        self.db.fetch_page(select, &count, page).await
    }

    /// Page through the movies of one genre ordered by title.
    ///
    /// The total counts only that genre.
    pub async fn list_by_genre(
        &self,
        id_genero: i64,
        page: PageRequest,
    ) -> Result<PageResult<GenreMovie>, DbError> {
        let select = Query::new(
            r#"
            SELECT id_pelicula, nombre, imagen, clasificacion
            FROM pelicula
            WHERE id_genero = @id_genero
            ORDER BY nombre
            LIMIT @limit OFFSET @offset
            "#,
        )
        .bind("id_genero", id_genero);
        let count = Query::new("SELECT COUNT(*) FROM pelicula WHERE id_genero = @id_genero")
            .bind("id_genero", id_genero);

        self.db.fetch_page(select, &count, page).await
    }

    /// Get one movie with its genre and director names.
    pub async fn get(&self, id_pelicula: i64) -> Result<Option<MovieDetail>, DbError> {
        let query = Query::new(
            r#"
            SELECT
                pelicula.nombre,
                pelicula.sinopsis,
                pelicula.imagen,
                pelicula.trailer,
                genero.nombre AS genero,
                pelicula.duracion,
                pelicula.clasificacion,
                director.nombre AS director,
                pelicula.anio
            FROM pelicula
            INNER JOIN genero ON pelicula.id_genero = genero.id_genero
            INNER JOIN director ON pelicula.id_director = director.id_director
            WHERE pelicula.id_pelicula = @id_pelicula
            "#,
        )
        .bind("id_pelicula", id_pelicula);

        self.db.fetch_optional(&query).await
    }

    /// Most played movies, highest play count first.
    pub async fn top_played(&self) -> Result<Vec<TopMovie>, DbError> {
        let query = Query::new(
            r#"
            SELECT
                pelicula.nombre,
                pelicula.sinopsis,
                pelicula.imagen,
                pelicula.trailer,
                genero.nombre AS genero,
                pelicula.duracion,
                pelicula.clasificacion,
                director.nombre AS director,
                pelicula.anio,
                pelicula.reproducciones
            FROM pelicula
            INNER JOIN genero ON pelicula.id_genero = genero.id_genero
            INNER JOIN director ON pelicula.id_director = director.id_director
            ORDER BY pelicula.reproducciones DESC NULLS LAST
            LIMIT @limit
            "#,
        )
        .bind("limit", TOP_PLAYED);

        self.db.fetch_all(&query).await
    }

    /// Match the term against title, genre and director names.
    pub async fn search(&self, term: &SearchTerm) -> Result<Vec<SearchHit>, DbError> {
        self.db.fetch_all(&build_search(term)).await
    }
}
