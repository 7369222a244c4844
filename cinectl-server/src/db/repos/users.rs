//! User repository
//!
//! The password column is `"contraseña"` and is always quoted.

use sqlx::FromRow;

use crate::db::{DbError, Query, QueryExecutor};
use crate::models::{Email, NewUser};

/// Stored login data for one user
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id_usuario: i32,
    pub correo: String,
    /// Password digest (or legacy plain text awaiting rehash)
    pub contrasena: String,
}

/// User repository
pub struct UserRepo<'a> {
    db: &'a QueryExecutor,
}

impl<'a> UserRepo<'a> {
    pub fn new(db: &'a QueryExecutor) -> Self {
        Self { db }
    }

    pub async fn find_by_email(&self, correo: &Email) -> Result<Option<UserCredentials>, DbError> {
        let query = Query::new(
            r#"
            SELECT id_usuario, correo, "contraseña" AS contrasena
            FROM usuario
            WHERE correo = @correo
            "#,
        )
        .bind("correo", correo.as_str());

        self.db.fetch_optional(&query).await
    }

    pub async fn email_taken(&self, correo: &Email) -> Result<bool, DbError> {
        let query = Query::new("SELECT COUNT(*) FROM usuario WHERE correo = @correo")
            .bind("correo", correo.as_str());
        Ok(self.db.fetch_count(&query).await? > 0)
    }

    /// Insert a user with an already-hashed password.
    ///
    /// A concurrent registration of the same email surfaces as
    /// `DbError::Conflict` if `correo` carries a unique index.
    pub async fn create(&self, user: &NewUser, digest: &str) -> Result<(), DbError> {
        let query = Query::new(
            r#"
            INSERT INTO usuario (nombre, correo, "contraseña", fecha_nacimiento, suscripcion)
            VALUES (@nombre, @correo, @digest, @fecha_nacimiento, @suscripcion)
            "#,
        )
        .bind("nombre", user.nombre.as_str())
        .bind("correo", user.correo.as_str())
        .bind("digest", digest)
        .bind("fecha_nacimiento", user.fecha_nacimiento)
        .bind("suscripcion", user.suscripcion);

        self.db.execute(&query).await?;
        Ok(())
    }

    /// Every user's stored password, for the rehash tool.
    pub async fn all_credentials(&self) -> Result<Vec<UserCredentials>, DbError> {
        let query = Query::new(
            r#"
            SELECT id_usuario, correo, "contraseña" AS contrasena
            FROM usuario
            ORDER BY id_usuario
            "#,
        );
        self.db.fetch_all(&query).await
    }

    /// Replace one user's stored password with a digest.
    pub async fn set_password(&self, id_usuario: i32, digest: &str) -> Result<bool, DbError> {
        let query = Query::new(
            r#"UPDATE usuario SET "contraseña" = @digest WHERE id_usuario = @id_usuario"#,
        )
        .bind("digest", digest)
        .bind("id_usuario", id_usuario);

        Ok(self.db.execute(&query).await? > 0)
    }
}
