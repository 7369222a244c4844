//! Director endpoints under `/directores`

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::{Director, DirectorProfile, DirectorRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::Listing;

/// GET /directores/nombres
async fn list_directors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Listing<Director>>, ApiError> {
    let listing = DirectorRepo::new(&state.db).list().await?;
    if listing.data.is_empty() {
        return Err(ApiError::not_found("director", "any"));
    }
    Ok(Json(listing))
}

/// GET /directores/por_director/{id_director}
async fn get_director(
    State(state): State<Arc<AppState>>,
    ValidId(id_director): ValidId,
) -> Result<Json<DirectorProfile>, ApiError> {
    DirectorRepo::new(&state.db)
        .get(id_director)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("director", id_director))
}

/// Director routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/directores/nombres", get(list_directors))
        .route("/directores/por_director/{id_director}", get(get_director))
}
