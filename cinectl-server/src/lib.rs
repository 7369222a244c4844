//! cinectl-server: movie catalog HTTP server
//!
//! Serves movies, genres, directors, users and favorites from PostgreSQL
//! through a lazily connected pool and a named-parameter query executor.

pub mod auth;
pub mod db;
pub mod http;
pub mod models;

pub use auth::{Argon2Hasher, HashError, PasswordHasher};
pub use db::{ConnectionPool, DbError, PoolConfig, QueryExecutor};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
