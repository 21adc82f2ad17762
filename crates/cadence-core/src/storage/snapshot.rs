//! Snapshot persistence for the completion log.
//!
//! The scheduler never touches disk itself. A store loads the snapshot at
//! startup and is asked to save it after every mutation.

use std::path::{Path, PathBuf};

use crate::completion::LogSnapshot;
use crate::error::{Result, StorageError};

/// Load/save of a serialized completion log.
pub trait SnapshotStore {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<LogSnapshot>>;

    fn save(&self, snapshot: &LogSnapshot) -> Result<()>;
}

/// Pretty-printed JSON file holding one snapshot.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_error(&self, message: impl ToString) -> StorageError {
        StorageError::File {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> Result<Option<LogSnapshot>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.file_error(e).into()),
        };
        let snapshot: LogSnapshot = serde_json::from_str(&content)
            .map_err(|e| StorageError::CorruptSnapshot(format!("{}: {e}", self.path.display())))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &LogSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        // Write to a sibling file first so a crash never leaves half a snapshot.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.file_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.file_error(e))?;
        tracing::debug!(
            path = %self.path.display(),
            records = snapshot.records.len(),
            "snapshot written"
        );
        Ok(())
    }
}
