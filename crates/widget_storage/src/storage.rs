//! Key/value storage trait and implementations

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::warn;

/// String key/value persistence, modeled after browser local storage.
///
/// Infallible by contract: implementations swallow backing-medium errors
/// and degrade to doing nothing rather than propagating them.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Purely in-memory storage; identifiers do not survive the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.values.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.values.lock() {
            map.remove(key);
        }
    }
}

/// File-backed storage: one JSON object per widget install.
///
/// Reads and writes the whole map each time; any I/O or parse failure is
/// logged and the operation proceeds as if the store were empty.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> HashMap<String, String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("failed to read widget storage: {}", err);
                }
                return HashMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(err) => {
                warn!("failed to parse widget storage: {}", err);
                HashMap::new()
            }
        }
    }

    fn store(&self, map: &HashMap<String, String>) {
        let content = match serde_json::to_string_pretty(map) {
            Ok(content) => content,
            Err(err) => {
                warn!("failed to serialize widget storage: {}", err);
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!("failed to create widget storage dir: {}", err);
                return;
            }
        }

        if let Err(err) = std::fs::write(&self.path, content) {
            warn!("failed to write widget storage: {}", err);
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.load();
        map.insert(key.to_string(), value.to_string());
        self.store(&map);
    }

    fn remove(&self, key: &str) {
        let mut map = self.load();
        if map.remove(key).is_some() {
            self.store(&map);
        }
    }
}
