//! JSON-backed storage area.
//!
//! `JsonFileStore` persists the whole key/value map in a single JSON file on
//! disk. The map is loaded once when the store opens and kept in memory; every
//! mutation rewrites the full document.
//!
//! ### I/O characteristics & caveats
//! - Reads are served from the in-memory cache and never touch the disk.
//! - Each mutation **rewrites** the entire JSON file. The document holds a
//!   handful of small storefront keys, so this stays cheap.
//! - File writes are not atomic.
//! - A missing or corrupt file opens as an empty store; the corruption is
//!   logged and the damaged content is overwritten on the next mutation.
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};

use crate::engine::storage::area::StorageArea;

/// Persistent storage area backed by a single pretty-printed JSON document.
pub struct JsonFileStore {
    /// Path to the JSON file where the map is stored.
    path: PathBuf,

    /// In-memory cache of the on-disk document.
    map: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Opens (or creates) the store at `path`, loading any existing document.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = Self::load_file(&path);
        Self {
            path,
            map: Mutex::new(map),
        }
    }

    /// Loads and deserializes the store file.
    ///
    /// A missing file yields an empty map. So does a file that no longer
    /// parses; the corruption is logged.
    fn load_file(path: &Path) -> HashMap<String, String> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                log::warn!("Cannot read store file {}: {e}", path.display());
                return HashMap::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Discarding corrupt store file {}: {e}", path.display());
            HashMap::new()
        })
    }

    /// Serializes and writes the full document (pretty-printed).
    fn save_file(&self, map: &HashMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("writing store file {}", self.path.display()))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.map.lock().map_err(|_| anyhow!("storage lock poisoned"))
    }
}

impl StorageArea for JsonFileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.lock()?;
        map.insert(key.to_string(), value.to_string());
        self.save_file(&map)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut map = self.lock()?;
        map.remove(key);
        self.save_file(&map)
    }

    fn clear(&self) -> Result<()> {
        let mut map = self.lock()?;
        map.clear();
        self.save_file(&map)
    }

    fn len(&self) -> usize {
        self.map.lock().map(|m| m.len()).unwrap_or(0)
    }

    fn keys(&self) -> Vec<String> {
        let mut v: Vec<String> = self
            .map
            .lock()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        v.sort_unstable();
        v
    }
}
