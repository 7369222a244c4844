//! Multi-column fuzzy search predicate
//!
//! Column identifiers come from a fixed list; only the term's LIKE
//! patterns are bound.

use once_cell::sync::Lazy;

use super::Query;
use crate::models::SearchTerm;

/// Columns searched, joined through `genero` and `director`
pub const SEARCH_COLUMNS: [&str; 3] = ["pelicula.nombre", "genero.nombre", "director.nombre"];

/// Bind names of the four pattern variants, see [`SearchTerm::patterns`]
pub const PATTERN_BINDS: [&str; 4] = ["contains", "starts_with", "word", "last_word"];

static SEARCH_SQL: Lazy<String> = Lazy::new(|| {
    format!(
        r#"
        SELECT
            pelicula.nombre,
            pelicula.imagen,
            pelicula.clasificacion,
            genero.nombre AS genero,
            director.nombre AS director
        FROM pelicula
        INNER JOIN genero ON pelicula.id_genero = genero.id_genero
        INNER JOIN director ON pelicula.id_director = director.id_director
        WHERE {}
        ORDER BY pelicula.nombre ASC
        "#,
        fuzzy_predicate(&SEARCH_COLUMNS, &PATTERN_BINDS)
    )
});

/// `column ILIKE @bind` for every column/bind pair, OR-combined.
pub fn fuzzy_predicate(columns: &[&str], binds: &[&str]) -> String {
    columns
        .iter()
        .flat_map(|column| {
            binds
                .iter()
                .map(move |bind| format!("{} ILIKE @{}", column, bind))
        })
        .collect::<Vec<_>>()
        .join("\n           OR ")
}

/// Search movies by title, genre name or director name.
pub fn build_search(term: &SearchTerm) -> Query {
    let patterns = term.patterns();
    Query::new(SEARCH_SQL.as_str())
        .bind("contains", patterns.contains)
        .bind("starts_with", patterns.starts_with)
        .bind("word", patterns.word)
        .bind("last_word", patterns.last_word)
}
