//! Key/value persistence for the update state

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, UpdateError};

/// Stores serialized state documents by key
pub trait StateStorage: Send + Sync {
    /// `None` when nothing has been stored under `key`
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, contents: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl StateStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        log::trace!("Loading {key} from {path:?}");

        if !path.exists() {
            log::trace!("State file not found, nothing to restore");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            log::error!("Failed to read state file: {e}");
            UpdateError::Storage(format!("Failed to read state file: {e}"))
        })?;

        Ok(Some(contents))
    }

    /// Atomic write: temp file + rename
    fn save(&self, key: &str, contents: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            UpdateError::Storage(format!("Failed to create state directory: {e}"))
        })?;

        let path = self.path_for(key);
        let temp_path = path.with_extension("tmp");

        std::fs::write(&temp_path, contents).map_err(|e| {
            log::error!("Failed to write state file: {e}");
            UpdateError::Storage(format!("Failed to write state file: {e}"))
        })?;

        std::fs::rename(&temp_path, &path).map_err(|e| {
            log::error!("Failed to finalize state file: {e}");
            UpdateError::Storage(format!("Failed to finalize state file: {e}"))
        })?;

        log::trace!("Saved {key} to {path:?}");
        Ok(())
    }
}

/// Process-local storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| UpdateError::Storage(format!("Storage lock error: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, contents: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| UpdateError::Storage(format!("Storage lock error: {e}")))?;
        entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

/// Sanitize a key for use as a file name
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
