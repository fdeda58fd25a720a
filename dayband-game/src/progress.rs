//! Durable progress storage seam.
//!
//! Platform shells provide the real device-backed implementation (browser
//! localStorage, app preferences, ...); the core only depends on this trait.
//! Corrupted content is indistinguishable from absent content on read, so a
//! bad record degrades to a fresh start instead of crashing the game.
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Key-value table scoped to the device. Last write wins; no transactions.
pub trait ProgressStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read and parse the value stored at `key`.
    ///
    /// Returns `None` when the key was never written or the stored content
    /// does not parse; parse failures are never surfaced to callers.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    /// Overwrite the value stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the value cannot be serialized or written.
    /// Callers treat failures as non-fatal: log and continue.
    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), Self::Error>;

    /// All currently stored keys starting with `prefix`.
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String>;
}

/// In-memory store over raw JSON strings, shared by clone.
///
/// Used by tests and host shells that do not need durability; it exercises
/// the same serialize/parse path a device-backed store would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a raw string without going through serde, e.g. to simulate a
    /// corrupted record.
    pub fn set_raw(&self, key: &str, raw: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
    }

    /// Raw stored content for a key, if any.
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl ProgressStore for MemoryStore {
    type Error = serde_json::Error;

    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.entries.borrow().get(key).cloned()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("discarding unreadable record at {key}: {err}");
                None
            }
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), Self::Error> {
        let raw = serde_json::to_string(value)?;
        self.entries.borrow_mut().insert(key.to_string(), raw);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .borrow()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_structured_values() {
        let store = MemoryStore::new();
        store.set("k", &vec![1, 2, 3]).unwrap();
        assert_eq!(store.get::<Vec<i32>>("k"), Some(vec![1, 2, 3]));
        assert_eq!(store.get::<Vec<i32>>("missing"), None);
    }

    #[test]
    fn corrupted_content_reads_as_absent() {
        let store = MemoryStore::new();
        store.set_raw("k", "{not json");
        assert_eq!(store.get::<Vec<i32>>("k"), None);
        // The raw bytes are untouched; only the read degrades.
        assert_eq!(store.get_raw("k").as_deref(), Some("{not json"));
    }

    #[test]
    fn last_write_wins() {
        let store = MemoryStore::new();
        store.set("k", &1).unwrap();
        store.set("k", &2).unwrap();
        assert_eq!(store.get::<i32>("k"), Some(2));
    }

    #[test]
    fn prefix_enumeration_sees_clone_writes() {
        let store = MemoryStore::new();
        let alias = store.clone();
        alias.set("site_a", &0).unwrap();
        store.set("site_b", &1).unwrap();
        store.set("other_c", &2).unwrap();
        let mut keys = store.keys_with_prefix("site_");
        keys.sort();
        assert_eq!(keys, vec!["site_a", "site_b"]);
    }
}
