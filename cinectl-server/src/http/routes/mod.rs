//! Route handlers organized by resource

pub mod health;
pub mod movies;
pub mod genres;
pub mod directors;
pub mod users;

use serde::Serialize;

/// `{"data": [...]}` envelope for unpaged lists
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: Vec<T>,
}

/// `{"message": "..."}` body for successful writes
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Router over a pool that can never connect. Any request that reaches
    //! the database shows up in `connect_attempts()`.

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use sqlx::PgPool;
    use tower::ServiceExt;

    use crate::db::{ConnectionPool, Connector, PoolConfig};
    use crate::http::server::{build_router, AppState, ServerConfig};

    struct Unreachable;

    #[async_trait]
    impl Connector for Unreachable {
        async fn connect(&self, _config: &PoolConfig) -> Result<PgPool, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    pub fn offline_app() -> (Router, ConnectionPool) {
        let pool = ConnectionPool::with_connector(
            PoolConfig::new("postgres://localhost/cinectl_test"),
            Unreachable,
        );
        let app = build_router(AppState::new(pool.clone()), &ServerConfig::default());
        (app, pool)
    }

    pub async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        send(app, request).await
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
