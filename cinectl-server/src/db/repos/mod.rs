//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the shared `QueryExecutor`; one method per route query
//! - Uses JOINs for names of related rows (no N+1)
//! - Lookups by id return `Option`; the caller decides what "missing" means

pub mod movies;
pub mod genres;
pub mod directors;
pub mod users;
pub mod favorites;

pub use movies::{GenreMovie, MovieDetail, MovieRepo, MovieSummary, SearchHit, TopMovie};
pub use genres::{GenreName, GenreRepo};
pub use directors::{Director, DirectorProfile, DirectorRepo};
pub use users::{UserCredentials, UserRepo};
pub use favorites::{FavoriteMovie, FavoriteRepo};
