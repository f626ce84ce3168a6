use std::fs;
use std::path::{Path, PathBuf};

use super::{Segment, SegmentSource};
use crate::error::{TtError, TtResult};
use crate::store::{FileState, FileStore, FILE_STATE_DB};
use crate::text::paragraphs;

const MAX_PATH_DISPLAY: usize = 80;

/// The paragraphs of a file, one per test, resuming where the last run left
/// off.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    key: String,
    paragraphs: Vec<String>,
    /// Index of the paragraph served last; `None` before the first batch.
    current: Option<usize>,
    resume_at: usize,
    store: FileStore,
    state: FileState,
}

impl FileSource {
    /// Open `path`. `start` overrides the stored position and is persisted
    /// right away.
    pub fn open(path: &Path, start: Option<usize>, store: FileStore) -> TtResult<Self> {
        let read_err = |source| TtError::ReadSource {
            path: path.to_path_buf(),
            source,
        };
        let path = std::path::absolute(path).map_err(read_err)?;
        let text = fs::read_to_string(&path).map_err(read_err)?;
        let key = path.to_string_lossy().into_owned();

        let mut state: FileState = store.read(FILE_STATE_DB).unwrap_or_default();
        if let Some(start) = start {
            state.insert(key.clone(), start);
            store.write(FILE_STATE_DB, &state)?;
        }
        let resume_at = state.get(&key).copied().unwrap_or(0);
        tracing::debug!(path = %path.display(), resume_at, "opened text file");

        Ok(Self {
            path,
            key,
            paragraphs: paragraphs(&text),
            current: None,
            resume_at,
            store,
            state,
        })
    }

    fn short_path(&self) -> String {
        let path = self.path.to_string_lossy();
        let chars: Vec<char> = path.chars().collect();
        if chars.len() < MAX_PATH_DISPLAY {
            return path.into_owned();
        }
        let tail: String = chars[chars.len() - MAX_PATH_DISPLAY..].iter().collect();
        format!("..{tail}")
    }
}

impl SegmentSource for FileSource {
    fn next_batch(&mut self) -> TtResult<Option<Vec<Segment>>> {
        let index = self.current.map_or(self.resume_at, |i| i + 1);
        self.current = Some(index);

        self.state.insert(self.key.clone(), index);
        if let Err(err) = self.store.write(FILE_STATE_DB, &self.state) {
            tracing::warn!(%err, "failed to save file progress");
        }

        Ok(self
            .paragraphs
            .get(index)
            .map(|p| vec![Segment::new(p.as_str(), "", index as i64)]))
    }

    fn info(&self) -> Option<String> {
        let index = self.current.filter(|&i| i < self.paragraphs.len())?;
        Some(format!(
            "Paragraph: {}/{}\n\nFile: {}",
            index + 1,
            self.paragraphs.len(),
            self.short_path()
        ))
    }
}
