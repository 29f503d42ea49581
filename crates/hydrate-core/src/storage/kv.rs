//! Key-value persistence seam.
//!
//! Values are stored as JSON text under flat string keys. Reads go through
//! [`StoreExt::load_or`], which never fails: a missing key, a malformed
//! value or a backend error all degrade to the supplied default.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;
}

pub trait StoreExt: KeyValueStore {
    /// Read `key`, falling back to `default` on absence or any fault.
    fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get_raw(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, error = %e, "malformed stored value, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "store read failed, using default");
                default
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json)
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}

/// In-process store. Nothing survives the process; used by tests and as a
/// fallback when no database can be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_raw(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_raw(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn missing_key_yields_default() {
        let store = MemoryStore::new();
        assert_eq!(store.load_or("dailyCount", 0u32), 0);
        assert!(store.load_or("isRunning", true));
    }

    #[test]
    fn malformed_value_yields_default() {
        let store = MemoryStore::new();
        store.set_raw("dailyCount", "not a number").unwrap();
        assert_eq!(store.load_or("dailyCount", 7u32), 7);

        store.set_raw("weeklyHistory", "[1,2,3]").unwrap();
        let history: BTreeMap<String, u32> = store.load_or("weeklyHistory", BTreeMap::new());
        assert!(history.is_empty());
    }

    #[test]
    fn saved_value_reads_back() {
        let store = MemoryStore::new();
        let mut history = BTreeMap::new();
        history.insert("2024-03-01".to_string(), 9u32);
        store.save("weeklyHistory", &history).unwrap();

        let loaded: BTreeMap<String, u32> = store.load_or("weeklyHistory", BTreeMap::new());
        assert_eq!(loaded, history);
    }

    #[test]
    fn works_through_trait_objects() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.save("currentStreak", &4u32).unwrap();
        assert_eq!(store.load_or("currentStreak", 0u32), 4);
    }
}
