//! Namespaced JSON key-value store.
//!
//! Every key is stored as `prefix + key`. Reads never fail: a missing key,
//! a backend error or an unparseable value all yield the caller's default.
//! Writes report success as `bool`; the `try_` variants expose the cause.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::Backend;
use crate::error::{Result, StoreError};

pub const DEFAULT_PREFIX: &str = "holyBless_";

const PROBE_KEY: &str = "__storage_test__";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    pub available: bool,
    pub total_bytes: u64,
    pub app_bytes: u64,
}

pub struct KvStore {
    backend: Box<dyn Backend>,
    prefix: String,
    quota: Option<u64>,
}

impl KvStore {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            prefix: DEFAULT_PREFIX.to_string(),
            quota: None,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Cap on total stored bytes (keys + values, all namespaces).
    pub fn with_quota(mut self, quota: Option<u64>) -> Self {
        self.quota = quota;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    // --- Reads ---

    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(&self.full_key(key))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!("failed to read '{key}': {e}");
                default
            }
        }
    }

    // --- Writes ---

    pub fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let full = self.full_key(key);
        let raw = serde_json::to_string(value)?;
        if let Some(quota) = self.quota {
            let existing = self
                .backend
                .get(&full)?
                .map(|v| (full.len() + v.len()) as u64)
                .unwrap_or(0);
            let needed = self.backend.total_bytes()? - existing + (full.len() + raw.len()) as u64;
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }
        self.backend.set(&full, &raw)
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.try_set(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to write '{key}': {e}");
                false
            }
        }
    }

    pub fn try_remove(&self, key: &str) -> Result<()> {
        self.backend.remove(&self.full_key(key))
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.try_remove(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to remove '{key}': {e}");
                false
            }
        }
    }

    /// Remove every key in this namespace. Returns how many were removed.
    pub fn try_clear(&self) -> Result<usize> {
        let mut removed = 0;
        for key in self.backend.keys()? {
            if key.starts_with(&self.prefix) {
                self.backend.remove(&key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    pub fn clear(&self) -> bool {
        match self.try_clear() {
            Ok(n) => {
                tracing::debug!("cleared {n} keys under '{}'", self.prefix);
                true
            }
            Err(e) => {
                tracing::warn!("failed to clear storage: {e}");
                false
            }
        }
    }

    // --- Diagnostics ---

    /// Probe with a throwaway write outside the namespace.
    pub fn is_available(&self) -> bool {
        self.backend.set(PROBE_KEY, PROBE_KEY).is_ok() && self.backend.remove(PROBE_KEY).is_ok()
    }

    pub fn storage_info(&self) -> StorageInfo {
        if !self.is_available() {
            return StorageInfo {
                available: false,
                total_bytes: 0,
                app_bytes: 0,
            };
        }
        let mut total_bytes = 0u64;
        let mut app_bytes = 0u64;
        for key in self.backend.keys().unwrap_or_default() {
            let len = match self.backend.get(&key) {
                Ok(Some(v)) => (key.len() + v.len()) as u64,
                _ => continue,
            };
            total_bytes += len;
            if key.starts_with(&self.prefix) {
                app_bytes += len;
            }
        }
        StorageInfo {
            available: true,
            total_bytes,
            app_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, SqliteBackend};
    use serde_json::json;

    /// Backend whose writes always fail, like disabled browser storage.
    struct Disabled;

    impl Backend for Disabled {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(StoreError::Unavailable("disabled".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(StoreError::Unavailable("disabled".into()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(StoreError::Unavailable("disabled".into()))
        }
        fn keys(&self) -> Result<Vec<String>> {
            Err(StoreError::Unavailable("disabled".into()))
        }
    }

    #[test]
    fn test_missing_key_returns_default() {
        let store = KvStore::new(MemoryBackend::new());
        assert_eq!(store.get("missingKey", 42), 42);
    }

    #[test]
    fn test_set_then_get_is_identity() {
        let store = KvStore::new(SqliteBackend::open_in_memory().unwrap());
        let value = json!({"a": [1, 2.5, "three"], "b": null, "c": {"nested": true}});
        assert!(store.set("doc", &value));
        assert_eq!(store.get("doc", serde_json::Value::Null), value);
    }

    #[test]
    fn test_keys_are_prefixed() {
        let store = KvStore::new(MemoryBackend::new());
        store.set("stats", &1);
        assert_eq!(
            store.backend().keys().unwrap(),
            vec![format!("{DEFAULT_PREFIX}stats")]
        );
    }

    #[test]
    fn test_unparseable_value_returns_default() {
        let store = KvStore::new(MemoryBackend::new());
        store.backend().set("holyBless_broken", "{not json").unwrap();
        assert_eq!(store.get("broken", 7), 7);
        assert!(store.try_get::<i32>("broken").is_err());
    }

    #[test]
    fn test_type_mismatch_returns_default() {
        let store = KvStore::new(MemoryBackend::new());
        store.set("n", "a string");
        assert_eq!(store.get("n", 5u32), 5);
    }

    #[test]
    fn test_remove() {
        let store = KvStore::new(MemoryBackend::new());
        store.set("k", &true);
        assert!(store.remove("k"));
        assert!(!store.get("k", false));
        assert!(store.remove("k"), "removing a missing key still succeeds");
    }

    #[test]
    fn test_clear_leaves_foreign_keys() {
        let store = KvStore::new(MemoryBackend::new());
        store.set("a", &1);
        store.set("b", &2);
        store.backend().set("otherApp_token", "\"keep\"").unwrap();
        store.backend().set("selectedTheme", "theme-forest").unwrap();

        assert_eq!(store.try_clear().unwrap(), 2);
        assert_eq!(store.get("a", 0), 0);
        let keys = store.backend().keys().unwrap();
        assert_eq!(keys, vec!["otherApp_token", "selectedTheme"]);
    }

    #[test]
    fn test_custom_prefix_isolates() {
        let store = KvStore::new(MemoryBackend::new()).with_prefix("test_");
        store.set("k", &1);
        assert_eq!(store.backend().keys().unwrap(), vec!["test_k"]);
    }

    #[test]
    fn test_disabled_backend_degrades() {
        let store = KvStore::new(Disabled);
        assert_eq!(store.get("x", 3), 3);
        assert!(!store.set("x", &4));
        assert!(!store.remove("x"));
        assert!(!store.clear());
        assert!(!store.is_available());
        assert!(!store.storage_info().available);
    }

    #[test]
    fn test_quota_exceeded() {
        let store = KvStore::new(MemoryBackend::new()).with_quota(Some(40));
        assert!(store.set("small", "x"));
        let big = "y".repeat(64);
        let err = store.try_set("big", &big).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { quota: 40, .. }));
        assert!(!store.set("big", &big));
        assert_eq!(store.get("small", String::new()), "x");
    }

    #[test]
    fn test_quota_counts_replacement_not_sum() {
        // "holyBless_k" (11) + "\"aaaa\"" (6) = 17 bytes
        let store = KvStore::new(MemoryBackend::new()).with_quota(Some(17));
        assert!(store.set("k", "aaaa"));
        assert!(store.set("k", "bbbb"), "overwrite of same size fits");
        assert!(!store.set("k", "ccccc"));
    }

    #[test]
    fn test_storage_info() {
        let store = KvStore::new(MemoryBackend::new());
        store.set("k", &1);
        store.backend().set("other", "12345").unwrap();
        let info = store.storage_info();
        assert!(info.available);
        assert_eq!(info.app_bytes, ("holyBless_k".len() + 1) as u64);
        assert_eq!(info.total_bytes, info.app_bytes + 10);
    }
}
