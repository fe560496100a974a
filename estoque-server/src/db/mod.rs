//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - One pool per process, bounded, shared through router state
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Parameterized statements only; dynamic SQL goes through QueryBuilder

pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
