//! Local key-value storage used for lesson notes.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use thiserror::Error;

const STORE_FILE: &str = "notes.json";

#[derive(Debug, Error)]
pub enum KvError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid store data in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    fn set(&self, key: &str, value: String) -> Result<(), KvError>;
}

/// Volatile store, used in tests and when no data directory is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> Result<(), KvError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Store persisted as a single JSON object under the data directory.
///
/// The whole map is rewritten on every `set`; the data set is a handful of notes.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store under `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, KvError> {
        let path = dir.as_ref().join(STORE_FILE);
        let entries = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|source| KvError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&data).map_err(|source| KvError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `entries` to a sibling temp file and rename it over the store file.
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), KvError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(io_err(dir))?;
        let data = serde_json::to_string_pretty(entries).map_err(|source| KvError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut file = NamedTempFile::new_in(dir).map_err(io_err(dir))?;
        file.write_all(data.as_bytes()).map_err(io_err(file.path()))?;
        file.as_file().sync_all().map_err(io_err(&self.path))?;
        file.persist(&self.path)
            .map_err(|err| io_err(&self.path)(err.error))?;
        Ok(())
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> KvError + use<> {
    let path = path.to_path_buf();
    move |source| KvError::Io { path, source }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    /// Memory only changes once the new map is on disk.
    fn set(&self, key: &str, value: String) -> Result<(), KvError> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_owned(), value);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}
