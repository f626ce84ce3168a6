use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::TtResult;
use crate::mistakes::Mistake;

/// Blob holding the last served paragraph of each file, keyed by absolute path.
pub const FILE_STATE_DB: &str = "file_state";
/// Blob accumulating every mistake ever made.
pub const MISTAKE_DB: &str = "mistakes";

pub type FileState = HashMap<String, usize>;

/// Key-value store of JSON blobs, one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store in the state directory, or the working directory as a last resort.
    pub fn new() -> Self {
        Self {
            dir: AppDirs::state_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            dir: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read a blob. Missing and unreadable blobs both come back as `None`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = fs::read(self.path(key)).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, %err, "ignoring corrupt store entry");
                None
            }
        }
    }

    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> TtResult<()> {
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_vec(value)?;
        fs::write(self.path(key), data)?;
        Ok(())
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Append `mistakes` to the mistake log.
pub fn save_mistakes(store: &FileStore, mistakes: &[Mistake]) -> TtResult<()> {
    let mut db: Vec<Mistake> = store.read(MISTAKE_DB).unwrap_or_default();
    db.extend_from_slice(mistakes);
    store.write(MISTAKE_DB, &db)
}
