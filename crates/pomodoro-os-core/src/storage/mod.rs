mod config;
pub mod database;
pub mod kv;
pub mod log_store;
pub mod seed;

pub use config::{Config, LogSeed, NotificationsConfig, StorageConfig, TimerConfig};
pub use database::Database;
pub use kv::{KvStore, MemoryKv};
pub use log_store::LogStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/pomodoro-os[-dev]/` based on POMODORO_OS_ENV.
///
/// Set POMODORO_OS_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMODORO_OS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomodoro-os-dev")
    } else {
        base_dir.join("pomodoro-os")
    };

    std::fs::create_dir_all(&dir).map_err(StorageError::DataDir)?;
    Ok(dir)
}
