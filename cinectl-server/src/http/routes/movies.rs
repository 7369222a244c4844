//! Movie endpoints under `/peliculas`

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::Data;
use crate::db::repos::{GenreMovie, GenreRepo, MovieDetail, MovieRepo, MovieSummary, SearchHit, TopMovie};
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::{PageResult, PaginationParams, SearchTerm};

/// `?query=` for the search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// GET /peliculas/infobasica - one page of all movies
async fn list_basic(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResult<MovieSummary>>, ApiError> {
    let page = params.parse()?;
    let result = MovieRepo::new(&state.db).list(page).await?;

    if result.is_empty() {
        return Err(ApiError::not_found("page", page.page()));
    }
    Ok(Json(result))
}

/// GET /peliculas/por_generos/{id_genero} - one page of a genre's movies
async fn list_by_genre(
    State(state): State<Arc<AppState>>,
    ValidId(id_genero): ValidId,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResult<GenreMovie>>, ApiError> {
    let page = params.parse()?;

    if !GenreRepo::new(&state.db).exists(id_genero).await? {
        return Err(ApiError::not_found("genre", id_genero));
    }

    let result = MovieRepo::new(&state.db)
        .list_by_genre(id_genero, page)
        .await?;

    if result.is_empty() {
        return Err(ApiError::not_found("page", page.page()));
    }
    Ok(Json(result))
}

/// GET /peliculas/por_pelicula/{id_pelicula}
async fn get_movie(
    State(state): State<Arc<AppState>>,
    ValidId(id_pelicula): ValidId,
) -> Result<Json<MovieDetail>, ApiError> {
    MovieRepo::new(&state.db)
        .get(id_pelicula)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("movie", id_pelicula))
}

/// GET /peliculas/top_10
async fn top_played(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TopMovie>>, ApiError> {
    let movies = MovieRepo::new(&state.db).top_played().await?;
    if movies.is_empty() {
        return Err(ApiError::not_found("movie", "top_10"));
    }
    Ok(Json(movies))
}

/// GET /peliculas/buscar?query=
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Data<SearchHit>>, ApiError> {
    let term = SearchTerm::new(params.query.as_deref().unwrap_or_default())?;
    let hits = MovieRepo::new(&state.db).search(&term).await?;

    if hits.is_empty() {
        return Err(ApiError::not_found("movie", term.as_str()));
    }
    Ok(Json(Data { data: hits }))
}

/// Movie routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/peliculas/infobasica", get(list_basic))
        .route("/peliculas/por_generos/{id_genero}", get(list_by_genre))
        .route("/peliculas/por_pelicula/{id_pelicula}", get(get_movie))
        .route("/peliculas/top_10", get(top_played))
        .route("/peliculas/buscar", get(search))
}
