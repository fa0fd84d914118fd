//! Local mirror of the favorites list.
//!
//! The whole list is stored as one JSON array under a fixed key, so every
//! write replaces the previous contents.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::models::FavoriteRecord;

/// Fixed storage key the favorites array lives under.
pub const FAVORITES_STORAGE_KEY: &str = "tmdb_favorites";

/// Synchronous on-device storage for the favorites list.
///
/// Absent storage reads as an empty list. Errors are returned to the caller,
/// which decides whether to absorb them.
pub trait LocalMirror: Send + Sync {
    fn read(&self) -> Result<Vec<FavoriteRecord>>;
    fn write(&self, records: &[FavoriteRecord]) -> Result<()>;
}

/// JSON file mirror at `{dir}/tmdb_favorites.json`.
#[derive(Debug, Clone)]
pub struct FileMirror {
    path: PathBuf,
}

impl FileMirror {
    /// Mirror stored in `dir` under the fixed storage key.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir
                .as_ref()
                .join(format!("{FAVORITES_STORAGE_KEY}.json")),
        }
    }

    /// Mirror stored at an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LocalMirror for FileMirror {
    fn read(&self) -> Result<Vec<FavoriteRecord>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write(&self, records: &[FavoriteRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string(records)?;
        let temp_path = self.temp_path();
        std::fs::write(&temp_path, serialized)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// In-process mirror holding the serialized array in memory.
#[derive(Debug, Default)]
pub struct MemoryMirror {
    raw: Mutex<Option<String>>,
}

impl MemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror whose storage already holds `raw`, which may be malformed.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    /// Raw stored text, if anything has been written.
    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LocalMirror for MemoryMirror {
    fn read(&self) -> Result<Vec<FavoriteRecord>> {
        match self.raw() {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, records: &[FavoriteRecord]) -> Result<()> {
        let serialized = serde_json::to_string(records)?;
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(serialized);
        Ok(())
    }
}

impl<T: LocalMirror + ?Sized> LocalMirror for std::sync::Arc<T> {
    fn read(&self) -> Result<Vec<FavoriteRecord>> {
        (**self).read()
    }

    fn write(&self, records: &[FavoriteRecord]) -> Result<()> {
        (**self).write(records)
    }
}
