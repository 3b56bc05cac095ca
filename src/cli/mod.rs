//! CLI module for the users API
//!
//! - `serve`: run the HTTP server
//! - `seed`: reset the account table to a known sample set

pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Users API - user records and accounts over HTTP
#[derive(Parser)]
#[command(name = "users-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Replace the accounts in the configured database with sample data
    Seed,
}

/// Read `.env` and configuration, then install logging.
///
/// Invalid configuration falls back to defaults with a warning.
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    logging::init_logging(&config.logging);

    if let Some(e) = load_error {
        warn!(error = %e, "Invalid configuration, using defaults");
    }

    config
}
