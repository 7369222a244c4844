//! Genre endpoints under `/generos`

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::{GenreName, GenreRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::Listing;

/// GET /generos/nombres
async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Listing<GenreName>>, ApiError> {
    let listing = GenreRepo::new(&state.db).list().await?;
    if listing.data.is_empty() {
        return Err(ApiError::not_found("genre", "any"));
    }
    Ok(Json(listing))
}

/// GET /generos/por_genero/{id_genero}
async fn get_genre(
    State(state): State<Arc<AppState>>,
    ValidId(id_genero): ValidId,
) -> Result<Json<GenreName>, ApiError> {
    GenreRepo::new(&state.db)
        .get(id_genero)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("genre", id_genero))
}

/// Genre routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generos/nombres", get(list_genres))
        .route("/generos/por_genero/{id_genero}", get(get_genre))
}
