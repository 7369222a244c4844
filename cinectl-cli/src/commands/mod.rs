//! Command implementations for the cinectl CLI

pub mod rehash;
pub mod serve;

pub use rehash::run_rehash;
pub use serve::run_serve;
