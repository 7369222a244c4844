//! Request models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic, and never reaches
//! the database layer.

pub mod validation;
pub mod pagination;
pub mod search;
pub mod user;

pub use validation::{check_id, parse_id, parse_positive, ValidationError};
pub use pagination::{Listing, PageRequest, PageResult, PaginationParams};
pub use search::{SearchPatterns, SearchTerm};
pub use user::{
    Credentials, Email, FavoriteRequest, LoginRequest, NewFavorite, NewUser, RegisterRequest,
};
