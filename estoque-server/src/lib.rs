//! estoque-server: HTTP CRUD over the `itens` inventory table
//!
//! Resolves MySQL settings from the environment, builds one lazy pool and
//! serves `/itens` (list/search, create, update, hard/soft delete) plus
//! `/health`.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, DbConfig, Deployment};
pub use db::{create_pool, DbError, ItemRepo, ItemStore};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
