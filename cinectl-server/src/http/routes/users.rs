//! User endpoints under `/usuarios`: registration, login and favorites

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::{Data, Message};
use crate::auth::HashError;
use crate::db::repos::{FavoriteMovie, FavoriteRepo, UserRepo};
use crate::db::ConflictKind;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{Credentials, FavoriteRequest, LoginRequest, NewFavorite, NewUser, RegisterRequest};

/// Successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub id_usuario: i32,
}

/// POST /usuarios/register
async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let user = NewUser::try_from(req)?;
    let users = UserRepo::new(&state.db);

    if users.email_taken(&user.correo).await? {
        return Err(ApiError::Conflict(ConflictKind::DuplicateEmail));
    }

    let hasher = Arc::clone(&state.hasher);
    let secret = user.contrasena.clone();
    let digest = tokio::task::spawn_blocking(move || hasher.hash(&secret)).await??;

    users.create(&user, &digest).await?;
    tracing::info!(correo = %user.correo.as_str(), "User registered");

    Ok((
        StatusCode::CREATED,
        Json(Message {
            message: "Usuario registrado exitosamente",
        }),
    ))
}

/// POST /usuarios/login
///
/// Unknown email and wrong password answer identically.
async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credentials = Credentials::try_from(req)?;

    let Some(user) = UserRepo::new(&state.db)
        .find_by_email(&credentials.correo)
        .await?
    else {
        return Err(ApiError::InvalidCredentials);
    };

    let hasher = Arc::clone(&state.hasher);
    let stored = user.contrasena.clone();
    let secret = credentials.contrasena;
    let verified = tokio::task::spawn_blocking(move || hasher.verify(&secret, &stored)).await?;

    match verified {
        Ok(true) => Ok(Json(LoginResponse {
            message: "Login exitoso",
            id_usuario: user.id_usuario,
        })),
        Ok(false) => Err(ApiError::InvalidCredentials),
        Err(HashError::MalformedDigest(reason)) => {
            tracing::warn!(
                id_usuario = user.id_usuario,
                %reason,
                "Stored password is not a digest; run `cinectl rehash-passwords`"
            );
            Err(ApiError::InvalidCredentials)
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /usuarios/buscar_favoritos/{id_usuario}
async fn list_favorites(
    State(state): State<Arc<AppState>>,
    ValidId(id_usuario): ValidId,
) -> Result<Json<Data<FavoriteMovie>>, ApiError> {
    let favorites = FavoriteRepo::new(&state.db).list_for_user(id_usuario).await?;
    if favorites.is_empty() {
        return Err(ApiError::not_found("favorites for user", id_usuario));
    }
    Ok(Json(Data { data: favorites }))
}

/// POST /usuarios/anadir_favoritos
async fn add_favorite(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<FavoriteRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let favorite = NewFavorite::try_from(req)?;
    FavoriteRepo::new(&state.db).add(favorite).await?;

    Ok((
        StatusCode::CREATED,
        Json(Message {
            message: "Película añadida a favoritos.",
        }),
    ))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/usuarios/register", post(register))
        .route("/usuarios/login", post(login))
        .route("/usuarios/buscar_favoritos/{id_usuario}", get(list_favorites))
        .route("/usuarios/anadir_favoritos", post(add_favorite))
}
