mod config;
pub mod database;
pub mod keys;
mod kv;

pub(crate) use config::check_range;
pub use config::{Config, SoundType, GOAL_RANGE, INTERVAL_RANGE, RESET_HOUR_RANGE};
pub use database::Database;
pub use kv::{KeyValueStore, MemoryStore, StoreExt};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding `config.toml` and `hydrate.db`.
///
/// `HYDRATE_HOME` wins when set. Otherwise `~/.config/hydrate[-dev]/`,
/// with the `-dev` suffix when `HYDRATE_ENV=dev`. The directory is created
/// if missing.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("HYDRATE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HYDRATE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("hydrate-dev")
            } else {
                base_dir.join("hydrate")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
