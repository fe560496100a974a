//! Database connection pool management
//!
//! Uses sqlx MySqlPool with explicit connection limits. The pool is built
//! once at startup and connects lazily, so the first request pays for the
//! first connection. Acquisition beyond the limit waits for a free slot.

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use crate::config::DbConfig;

/// Default maximum connections for the pool.
/// Kept low for serverless-sized database plans.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a MySQL connection pool.
///
/// # Example
///
/// ```ignore
/// let config = DbConfig::from_env()?;
/// let pool = create_pool(&config);
/// ```
pub fn create_pool(config: &DbConfig) -> MySqlPool {
    create_pool_with_options(config, DEFAULT_MAX_CONNECTIONS)
}

/// Create a MySQL connection pool with custom options.
///
/// # Arguments
///
/// * `config` - Resolved database settings
/// * `max_connections` - Maximum number of connections in the pool
pub fn create_pool_with_options(config: &DbConfig, max_connections: u32) -> MySqlPool {
    tracing::info!(
        context = %config.deployment,
        host = %config.host,
        database = %config.database,
        ssl = config.ssl,
        max_connections,
        "database pool configured"
    );

    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy_with(config.connect_options())
}
