//! Data-access error taxonomy

use std::time::Duration;

use super::conflict::{translate, ConflictKind};

/// Error returned by every data-access operation.
///
/// Raw `sqlx::Error`s become a `DbError` only through
/// [`conflict::translate`](super::conflict::translate), which the `From`
/// impl delegates to.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Pool unavailable. `retry_in` is set while a reconnect is scheduled.
    #[error("database unavailable: {reason}")]
    Connection {
        reason: String,
        retry_in: Option<Duration>,
    },

    /// Statement failed for any reason other than a uniqueness conflict
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// Query template and bindings disagree; raised before any I/O
    #[error("invalid query template: {0}")]
    Template(String),

    /// Write rejected by a unique constraint
    #[error("{kind}")]
    Conflict {
        kind: ConflictKind,
        constraint: Option<String>,
    },
}

impl DbError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        translate(err)
    }
}
