// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use plant_app_core::config::{ConfigError, ConfigStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory implementation of [`ConfigStore`] for testing.
///
/// Clones share storage, so a test can keep one handle while a
/// [`ConfigService`](plant_app_core::config::ConfigService) owns another.
///
/// # Example
///
/// ```
/// use plant_dry_tests::InMemoryConfigStore;
/// use plant_app_core::config::ConfigService;
/// use plant_app_core::prefs::{ScenePrefs, SCENE_PREFS_KEY};
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
///
/// service.save(SCENE_PREFS_KEY, &ScenePrefs::default()).unwrap();
/// assert_eq!(store.save_count(), 1);
/// assert!(store.contains_key(SCENE_PREFS_KEY));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    data: HashMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    remove_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
}

impl InMemoryConfigStore {
    /// Create a new empty in-memory config store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `value` serialized as JSON under `key`.
    pub fn with_json(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.lock().data.insert(key.to_owned(), value.as_bytes().to_vec());
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Configure the store to fail on load operations.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_on_load = fail;
    }

    /// Configure the store to fail on save operations.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_on_save = fail;
    }

    /// Number of `load_raw` attempts, failed ones included.
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// Number of `save_raw` attempts, failed ones included.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Number of `remove_raw` calls.
    pub fn remove_count(&self) -> usize {
        self.lock().remove_count
    }

    /// Check if a key exists in the store.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    /// Stored blob for `key` as UTF-8, if any.
    pub fn raw_string(&self, key: &str) -> Option<String> {
        self.lock()
            .data
            .get(key)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut inner = self.lock();
        inner.load_count += 1;
        if inner.fail_on_load {
            return Err(ConfigError::Other("simulated load failure".into()));
        }
        inner.data.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.save_count += 1;
        if inner.fail_on_save {
            return Err(ConfigError::Other("simulated save failure".into()));
        }
        inner.data.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.remove_count += 1;
        inner.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let store = InMemoryConfigStore::new();
        let other = store.clone();
        other.save_raw("k", b"v").unwrap();
        assert_eq!(store.load_raw("k").unwrap(), b"v");
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn failures_are_counted() {
        let store = InMemoryConfigStore::new();
        store.set_fail_on_save(true);
        assert!(matches!(store.save_raw("k", b"v"), Err(ConfigError::Other(_))));
        store.set_fail_on_load(true);
        assert!(matches!(store.load_raw("k"), Err(ConfigError::Other(_))));
        assert_eq!((store.save_count(), store.load_count()), (1, 1));
    }

    #[test]
    fn remove_forgets_the_key() {
        let store = InMemoryConfigStore::with_json("prefs", "{}");
        assert_eq!(store.raw_string("prefs").as_deref(), Some("{}"));
        store.remove_raw("prefs").unwrap();
        store.remove_raw("prefs").unwrap();
        assert!(matches!(store.load_raw("prefs"), Err(ConfigError::NotFound)));
        assert_eq!(store.remove_count(), 2);
    }
}
