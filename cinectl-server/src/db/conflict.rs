//! Driver error classification
//!
//! Unique violations are recognised by SQLSTATE code, never by message
//! text. The table (or constraint) the driver reports picks the domain
//! conflict.

use std::fmt;

use super::DbError;

/// PostgreSQL SQLSTATE for `unique_violation`
pub const UNIQUE_VIOLATION: &str = "23505";

/// Which uniqueness rule a write broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// `(id_usuario, id_pelicula)` already in `favorita_pelicula`
    DuplicateFavorite,
    /// `correo` already in `usuario`
    DuplicateEmail,
    /// Any other unique index
    UniqueViolation,
}

impl ConflictKind {
    /// Pick the conflict for the table (or, failing that, the constraint)
    /// named in the driver error.
    pub fn classify(table: Option<&str>, constraint: Option<&str>) -> Self {
        let names = [table, constraint];
        if names.iter().flatten().any(|n| n.contains("favorita_pelicula")) {
            Self::DuplicateFavorite
        } else if names.iter().flatten().any(|n| n.contains("usuario")) {
            Self::DuplicateEmail
        } else {
            Self::UniqueViolation
        }
    }

    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            Self::DuplicateFavorite => "the movie is already in this user's favorites",
            Self::DuplicateEmail => "the email address is already registered",
            Self::UniqueViolation => "a record with the same unique value already exists",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Classify a raw driver failure.
pub fn translate(err: sqlx::Error) -> DbError {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            DbError::Conflict {
                kind: ConflictKind::classify(db.table(), db.constraint()),
                constraint: db.constraint().map(str::to_owned),
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => DbError::Connection {
            reason: err.to_string(),
            retry_in: None,
        },
        other => DbError::Query(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;

    use sqlx::error::{DatabaseError, ErrorKind};

    /// Minimal driver error carrying a SQLSTATE and table
    #[derive(Debug)]
    struct FakeDbError {
        code: &'static str,
        table: Option<&'static str>,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            // Message text deliberately unrelated to uniqueness
            write!(f, "something went wrong")
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "something went wrong"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn table(&self) -> Option<&str> {
            self.table
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn db_error(code: &'static str, table: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError {
            code,
            table,
            constraint: None,
        }))
    }

    #[test]
    fn duplicate_favorite_is_conflict() {
        let err = translate(db_error(UNIQUE_VIOLATION, Some("favorita_pelicula")));
        assert!(matches!(
            err,
            DbError::Conflict {
                kind: ConflictKind::DuplicateFavorite,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_email_is_conflict() {
        let err = translate(db_error(UNIQUE_VIOLATION, Some("usuario")));
        assert!(matches!(
            err,
            DbError::Conflict {
                kind: ConflictKind::DuplicateEmail,
                ..
            }
        ));
    }

    #[test]
    fn constraint_name_used_when_table_missing() {
        let err = translate(sqlx::Error::Database(Box::new(FakeDbError {
            code: UNIQUE_VIOLATION,
            table: None,
            constraint: Some("favorita_pelicula_id_usuario_id_pelicula_key"),
        })));
        match err {
            DbError::Conflict { kind, constraint } => {
                assert_eq!(kind, ConflictKind::DuplicateFavorite);
                assert_eq!(
                    constraint.as_deref(),
                    Some("favorita_pelicula_id_usuario_id_pelicula_key")
                );
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn other_unique_tables_are_generic_conflicts() {
        let err = translate(db_error(UNIQUE_VIOLATION, Some("genero")));
        assert!(matches!(
            err,
            DbError::Conflict {
                kind: ConflictKind::UniqueViolation,
                ..
            }
        ));
    }

    #[test]
    fn other_codes_are_query_errors() {
        // foreign_key_violation
        let err = translate(db_error("23503", Some("favorita_pelicula")));
        assert!(matches!(err, DbError::Query(_)));
    }

    #[test]
    fn pool_failures_are_connection_errors() {
        assert!(translate(sqlx::Error::PoolTimedOut).is_connection());
        assert!(translate(sqlx::Error::PoolClosed).is_connection());

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(translate(sqlx::Error::Io(io)).is_connection());
    }

    #[test]
    fn row_not_found_is_query_error() {
        assert!(matches!(
            translate(sqlx::Error::RowNotFound),
            DbError::Query(_)
        ));
    }
}
