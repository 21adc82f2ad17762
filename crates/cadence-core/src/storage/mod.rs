mod config;
pub mod database;
pub mod migrations;
pub mod snapshot;

pub use config::{Config, HistoryWindow, LearningConfig, PatternConfig, SuggestionConfig, ValidationConfig};
pub use database::Database;
pub use snapshot::{JsonSnapshotStore, SnapshotStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/cadence[-dev]/` based on CADENCE_ENV.
///
/// Set CADENCE_ENV=dev to use development data directory.
/// CADENCE_DATA_DIR overrides the location entirely.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("CADENCE_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("CADENCE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("cadence-dev")
            } else {
                base_dir.join("cadence")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
