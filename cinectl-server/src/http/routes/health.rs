//! Root greeting and health check

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `ready` once the pool has connected, `pending` before
    pub database: &'static str,
}

/// GET /
async fn root() -> &'static str {
    "Hola a todos"
}

/// GET /health
///
/// Never touches the database, so it answers even while the pool is
/// waiting out a retry delay.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database: if state.pool().is_ready() {
            "ready"
        } else {
            "pending"
        },
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::http::routes::test_support::{get, offline_app};

    #[tokio::test]
    async fn health_reports_pending_database() {
        let (app, pool) = offline_app();
        let (status, body) = get(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "pending");
        assert_eq!(pool.connect_attempts(), 0);
    }

    #[tokio::test]
    async fn root_greets() {
        let (app, _pool) = offline_app();
        let (status, _) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
    }
}
