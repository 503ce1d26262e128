use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Object-safe string key/value storage area.
pub trait StorageArea: Send + Sync {
    /// Retrieves the value associated with the given key, or `None` if not found.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Sets the value for the given key, overwriting any existing value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the item with the given key.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Clears all items in the storage area.
    fn clear(&self) -> Result<()>;

    /// Returns the number of items in the storage area.
    fn len(&self) -> usize;

    /// Returns a vector of all keys in the storage area.
    fn keys(&self) -> Vec<String>;
}

/// Reads a JSON value stored under `key`.
///
/// A missing key yields `T::default()`. So does a value that no longer
/// deserializes: the corrupt value is discarded and logged, never surfaced
/// to the caller.
pub fn read_json<T: DeserializeOwned + Default>(area: &dyn StorageArea, key: &str) -> T {
    let Some(raw) = area.get_item(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Discarding corrupt value under {key:?}: {e}");
            T::default()
        }
    }
}

/// Serializes `value` as JSON and writes it under `key`.
///
/// Write failures are logged and swallowed: callers keep their in-memory
/// state and simply lose persistence for this mutation.
pub fn write_json<T: Serialize + ?Sized>(area: &dyn StorageArea, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Cannot serialize value for {key:?}: {e}");
            return;
        }
    };
    if let Err(e) = area.set_item(key, &raw) {
        log::warn!("Failed to persist {key:?}: {e}");
    }
}
