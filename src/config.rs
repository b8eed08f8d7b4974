//! Configuration loading and storage root resolution
//!
//! Resolution priority for each setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Compiled default (fallback)

use clap::Parser;
use std::path::PathBuf;

/// Flat-file storage service for profiles, audio tracks, and text edits
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Bot token reported by the health endpoint
    #[arg(long, env = "BOT_TOKEN", default_value = "dummy-token")]
    pub bot_token: String,

    /// Root directory for JSON stores and uploaded files
    #[arg(long, env = "STORAGE_ROOT", default_value = "storage")]
    pub storage_root: PathBuf,
}

impl Config {
    /// Create the storage root directory if it does not exist yet
    pub fn ensure_storage_root(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.storage_root)
    }
}
