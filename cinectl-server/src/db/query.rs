//! Parameterized queries with named binds
//!
//! Templates name their placeholders `@name`. Compilation rewrites each
//! distinct name to a positional `$n` marker, so user values only ever
//! travel as bind arguments. Quoted literals and identifiers are copied
//! untouched.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::postgres::PgArguments;
use sqlx::Arguments;

use super::DbError;
use crate::models::PageRequest;

/// A bindable value
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<NaiveDate> for Param {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

/// SQL template plus named bindings
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    sql: Cow<'static, str>,
    params: Vec<(&'static str, Param)>,
}

/// Query ready for the driver: positional SQL and values in `$n` order
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub values: Vec<Param>,
}

impl Query {
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind a value to `@name`. Binding the same name twice keeps the last value.
    pub fn bind(mut self, name: &'static str, value: impl Into<Param>) -> Self {
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    /// Bind `@limit` and `@offset` for a page window.
    pub fn paged(self, page: PageRequest) -> Self {
        self.bind("limit", page.limit()).bind("offset", page.offset())
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[(&'static str, Param)] {
        &self.params
    }

    /// Rewrite `@name` placeholders to `$n`.
    ///
    /// Fails if a placeholder has no binding or a binding is never used.
    pub fn compile(&self) -> Result<CompiledQuery, DbError> {
        let mut sql = String::with_capacity(self.sql.len());
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut values = Vec::new();

        let src = self.sql.as_ref();
        let mut chars = src.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '\'' | '"' => {
                    sql.push(c);
                    // Copy through the closing quote; doubled quotes stay inside.
                    while let Some((_, q)) = chars.next() {
                        sql.push(q);
                        if q == c {
                            if chars.peek().map(|(_, n)| *n) == Some(c) {
                                sql.push(c);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                    }
                }
                '@' if chars
                    .peek()
                    .is_some_and(|(_, n)| n.is_ascii_alphabetic() || *n == '_') =>
                {
                    let start = i + 1;
                    let mut end = start;
                    while let Some((j, n)) = chars.peek().copied() {
                        if n.is_ascii_alphanumeric() || n == '_' {
                            end = j + n.len_utf8();
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    let name = &src[start..end];

                    let position = match positions.get(name) {
                        Some(p) => *p,
                        None => {
                            let value = self
                                .params
                                .iter()
                                .find(|(n, _)| *n == name)
                                .map(|(_, v)| v.clone())
                                .ok_or_else(|| {
                                    DbError::Template(format!("no value bound for @{}", name))
                                })?;
                            values.push(value);
                            positions.insert(name, values.len());
                            values.len()
                        }
                    };
                    sql.push('$');
                    sql.push_str(&position.to_string());
                }
                _ => sql.push(c),
            }
        }

        if let Some((name, _)) = self
            .params
            .iter()
            .find(|(n, _)| !positions.contains_key(*n))
        {
            return Err(DbError::Template(format!(
                "@{} is bound but never used",
                name
            )));
        }

        Ok(CompiledQuery { sql, values })
    }
}

impl CompiledQuery {
    /// Encode the values as driver arguments.
    pub fn arguments(&self) -> Result<PgArguments, DbError> {
        let mut args = PgArguments::default();
        for value in &self.values {
            let added = match value {
                Param::Int(v) => args.add(*v),
                Param::Text(v) => args.add(v.clone()),
                Param::Bool(v) => args.add(*v),
                Param::Date(v) => args.add(*v),
            };
            added.map_err(|e| DbError::Template(format!("failed to encode argument: {}", e)))?;
        }
        Ok(args)
    }
}
