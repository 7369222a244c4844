//! User and favorite input validation
//!
//! Request bodies deserialize into the `*Request` types with every field
//! optional, then convert into validated values. Missing fields surface as
//! [`ValidationError::Empty`] rather than a JSON rejection.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{check_id, ValidationError};

/// Maximum length for emails
const MAX_EMAIL_LEN: usize = 254;

/// Something before the `@`, a dot somewhere after it, no whitespace.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// # Example
    /// ```
    /// use cinectl_server::models::Email;
    ///
    /// assert!(Email::new("ana@example.com").is_ok());
    /// assert!(Email::new("ana@example").is_err());
    /// assert!(Email::new("ana example@x.com").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "correo" });
        }
        if s.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::OutOfRange {
                field: "correo length",
                max: MAX_EMAIL_LEN as i64,
            });
        }
        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "correo",
                reason: "invalid email address",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// POST /usuarios/register body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub nombre: Option<String>,
    pub correo: Option<String>,
    #[serde(rename = "contraseña")]
    pub contrasena: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub suscripcion: Option<bool>,
}

/// Validated registration, password still in plain text
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nombre: String,
    pub correo: Email,
    pub contrasena: String,
    pub fecha_nacimiento: NaiveDate,
    pub suscripcion: bool,
}

impl TryFrom<RegisterRequest> for NewUser {
    type Error = ValidationError;

    fn try_from(req: RegisterRequest) -> Result<Self, Self::Error> {
        let nombre = required(req.nombre, "nombre")?;
        let correo = required(req.correo, "correo")?;
        let contrasena = required(req.contrasena, "contraseña")?;
        let fecha = required(req.fecha_nacimiento, "fecha_nacimiento")?;
        let suscripcion = req
            .suscripcion
            .ok_or(ValidationError::Empty { field: "suscripcion" })?;

        let correo = Email::new(&correo)?;
        let fecha_nacimiento = NaiveDate::parse_from_str(&fecha, "%Y-%m-%d").map_err(|_| {
            ValidationError::InvalidFormat {
                field: "fecha_nacimiento",
                reason: "expected YYYY-MM-DD",
            }
        })?;

        Ok(Self {
            nombre,
            correo,
            contrasena,
            fecha_nacimiento,
            suscripcion,
        })
    }
}

/// POST /usuarios/login body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub correo: Option<String>,
    #[serde(rename = "contraseña")]
    pub contrasena: Option<String>,
}

/// Validated login attempt
#[derive(Debug, Clone)]
pub struct Credentials {
    pub correo: Email,
    pub contrasena: String,
}

impl TryFrom<LoginRequest> for Credentials {
    type Error = ValidationError;

    fn try_from(req: LoginRequest) -> Result<Self, Self::Error> {
        let correo = required(req.correo, "correo")?;
        let contrasena = required(req.contrasena, "contraseña")?;
        Ok(Self {
            correo: Email::new(&correo)?,
            contrasena,
        })
    }
}

/// POST /usuarios/anadir_favoritos body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FavoriteRequest {
    pub id_usuario: Option<i64>,
    pub id_pelicula: Option<i64>,
}

/// Validated (user, movie) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewFavorite {
    pub id_usuario: i64,
    pub id_pelicula: i64,
}

impl TryFrom<FavoriteRequest> for NewFavorite {
    type Error = ValidationError;

    fn try_from(req: FavoriteRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            id_usuario: positive(req.id_usuario, "id_usuario")?,
            id_pelicula: positive(req.id_pelicula, "id_pelicula")?,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::Empty { field }),
    }
}

fn positive(value: Option<i64>, field: &'static str) -> Result<i64, ValidationError> {
    let value = value.ok_or(ValidationError::Empty { field })?;
    check_id(field, value)
}
