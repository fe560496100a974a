//! estoque CLI - inventory items HTTP service
//!
//! - `serve`: run the `/itens` HTTP API against MySQL
//! - `config`: show the resolved database settings (password redacted)

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "estoque",
    author,
    version,
    about = "HTTP CRUD service for the controle_estoque items table"
)]
struct Cli {
    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Resolve and print database settings, failing like `serve` would
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so RUST_LOG and DB settings from it are visible
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Config => commands::run_config()?,
    }
    Ok(())
}
