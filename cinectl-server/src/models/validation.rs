//! Validation error types

use std::fmt;

/// Validation error for request input.
///
/// Raised before any database I/O happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is missing or empty when it shouldn't be
    Empty { field: &'static str },

    /// Field must parse as an integer
    NotAnInteger { field: &'static str, value: String },

    /// Field must be a positive integer
    NotPositive { field: &'static str, value: i64 },

    /// Field exceeds the accepted maximum
    OutOfRange { field: &'static str, max: i64 },

    /// String doesn't match required format (e.g., email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Request body is not the expected JSON shape
    MalformedBody { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::NotAnInteger { field, value } => {
                write!(f, "{} must be an integer, got '{}'", field, value)
            }
            Self::NotPositive { field, value } => {
                write!(f, "{} must be a positive integer, got {}", field, value)
            }
            Self::OutOfRange { field, max } => {
                write!(f, "{} must not exceed {}", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::MalformedBody { reason } => write!(f, "invalid request body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Parse a positive integer from raw request text.
pub fn parse_positive(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger {
            field,
            value: raw.to_owned(),
        })?;

    if value <= 0 {
        return Err(ValidationError::NotPositive { field, value });
    }

    Ok(value)
}

/// Parse a row id: positive and within the `INTEGER` column range.
pub fn parse_id(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    check_id(field, parse_positive(field, raw)?)
}

/// Bound an already-numeric id to the `INTEGER` column range.
pub fn check_id(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    match i32::try_from(value) {
        Ok(_) => Ok(value),
        Err(_) => Err(ValidationError::OutOfRange {
            field,
            max: i32::MAX.into(),
        }),
    }
}
