//! `estoque config` - show what `serve` would connect to

use anyhow::{Context, Result};

use estoque_server::config::DbConfig;

pub fn run_config() -> Result<()> {
    let db = DbConfig::from_env().context("Failed to resolve database settings")?;
    println!("{db}");
    Ok(())
}
