//! Free-text search term
//!
//! A term is matched four ways against each searched column:
//! anywhere in the text, at the start, at the start of a later word,
//! and as the last word. The first keeps full substring recall, the other
//! three bias results toward word-boundary matches.

use super::ValidationError;

/// Longest accepted search term, in characters
const MAX_TERM_LEN: usize = 100;

/// Validated, non-empty search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

/// LIKE patterns derived from one search term, in bind order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPatterns {
    /// `%term%`
    pub contains: String,
    /// `term%`
    pub starts_with: String,
    /// `% term%`
    pub word: String,
    /// `% term`
    pub last_word: String,
}

impl SearchTerm {
    /// Validate a raw term. Surrounding whitespace is trimmed.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let term = raw.trim();
        if term.is_empty() {
            return Err(ValidationError::Empty { field: "query" });
        }
        if term.chars().count() > MAX_TERM_LEN {
            return Err(ValidationError::OutOfRange {
                field: "query length",
                max: MAX_TERM_LEN as i64,
            });
        }
        Ok(Self(term.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the LIKE patterns. Wildcards typed by the user match literally.
    pub fn patterns(&self) -> SearchPatterns {
        let escaped = escape_like(&self.0);
        SearchPatterns {
            contains: format!("%{}%", escaped),
            starts_with: format!("{}%", escaped),
            word: format!("% {}%", escaped),
            last_word: format!("% {}", escaped),
        }
    }
}

/// Escape LIKE metacharacters with the default `\` escape.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
