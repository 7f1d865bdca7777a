//! Key-value persistence for the desk collections.
//!
//! Each collection is stored whole under a fixed key as a JSON array of plain
//! objects. Saves are last-writer-wins; a missing or empty key loads as an
//! empty collection.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

pub const RESIDENCES_KEY: &str = "residences";
pub const STUDENTS_KEY: &str = "students";
pub const MAINTENANCE_REQUESTS_KEY: &str = "maintenanceRequests";
pub const EMPLOYEES_KEY: &str = "employees";

/// Text store addressed by key, the local-storage analogue the desk writes to.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store, shared between clones. Counts writes so callers can
/// assert that an operation left storage untouched.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryKeyValueStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(&['/', '\\', '.'][..]) {
            return Err(StorageError::Unavailable(format!(
                "key '{key}' cannot be mapped to a file name"
            )));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");
        let io_error = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::write(&staging, value).map_err(io_error)?;
        fs::rename(&staging, &path).map_err(io_error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored value under '{key}' is not a valid collection: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Serializes whole collections to JSON text and back.
#[derive(Debug, Clone)]
pub struct JsonPersistence<S> {
    store: S,
}

impl<S: KeyValueStore> JsonPersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(items).map_err(|source| PersistenceError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &encoded)?;
        debug!(key, count = items.len(), "collection saved");
        Ok(())
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, PersistenceError> {
        let raw = match self.store.get(key)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                debug!(key, "no stored collection; starting empty");
                return Ok(Vec::new());
            }
        };

        let items: Vec<T> =
            serde_json::from_str(&raw).map_err(|source| PersistenceError::Decode {
                key: key.to_string(),
                source,
            })?;
        debug!(key, count = items.len(), "collection loaded");
        Ok(items)
    }
}
