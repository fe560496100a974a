//! HTTP server command
//!
//! Resolves the database settings from the environment and runs the
//! items API until Ctrl+C/SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use estoque_server::config::DbConfig;
use estoque_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "ESTOQUE_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db = DbConfig::from_env().context("Failed to resolve database settings")?;

    tracing::info!(database = %db, "Starting estoque server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
    };

    // Run server (blocks until shutdown)
    run_server(&db, config).await.context("Server error")?;

    Ok(())
}
