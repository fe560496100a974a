//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uniqueness comes from the table's UNIQUE index, conflicts are caught
//! - Handlers depend on the store trait, not on a concrete pool

pub mod items;

pub use items::{DbError, ItemRepo, ItemStore};
