//! Shared start-up for the medrag binaries.

use anyhow::Context;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use medrag_core::config::{Config, Settings};

/// Load `.env`, then install a `fmt` subscriber filtered by `RUST_LOG`
/// (default `info`).
pub fn init() {
    let _ = dotenv::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Typed settings from `path`, or from `config.toml` in the working directory.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let config = match path {
        Some(p) => Config::from_file(p),
        None => Config::load(),
    }
    .context("reading configuration")?;
    config.settings().context("invalid configuration")
}
