//! Database layer - connection pool, query execution and repositories
//!
//! # Design Principles
//!
//! - One lazily-created pool per process, passed by handle
//! - Named binds only; user input never reaches SQL text
//! - Rely on DB constraints, translate conflicts by SQLSTATE
//! - Single statements; list endpoints count in a second query

pub mod conflict;
pub mod error;
pub mod executor;
pub mod pool;
pub mod query;
pub mod repos;
pub mod search;

pub use conflict::{translate, ConflictKind};
pub use error::DbError;
pub use executor::QueryExecutor;
pub use pool::{ConnectionPool, Connector, PgConnector, PoolConfig};
pub use query::{Param, Query};
pub use search::build_search;
