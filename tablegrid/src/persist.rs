// Filter persistence: hydrate once per key, write through on every change,
// and notify an outside listener on a trailing-edge debounce.

use crate::error::Result;
use crate::filter::{FilterDescriptor, FilterStore};
use crate::storage::KeyValueStore;
use crate::timer::Debouncer;
use std::time::Duration;

/// Default quiet period before the change callback fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Outcome of a hydration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// The stored list replaced the in-memory one.
    Restored,
    /// The key is absent or holds a malformed payload.
    Missing,
    /// Storage could not be read.
    Unavailable,
    /// This key was already hydrated.
    Skipped,
}

enum Stored {
    List(Vec<FilterDescriptor>),
    Missing,
    Unavailable,
}

/// Reads and writes one grid's filter list under a storage key.
pub struct FilterPersistence {
    storage: Box<dyn KeyValueStore>,
    key: String,
    hydrated_key: Option<String>,
}

impl FilterPersistence {
    pub fn new(storage: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        FilterPersistence {
            storage,
            key: key.into(),
            hydrated_key: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Point at a different slot. The next `hydrate` reads it.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated_key.as_deref() == Some(self.key.as_str())
    }

    /// Read the stored list. Absent keys, unreadable storage and malformed
    /// payloads all come back as `None`.
    pub fn load(&self) -> Option<Vec<FilterDescriptor>> {
        match self.read() {
            Stored::List(list) => Some(list),
            Stored::Missing | Stored::Unavailable => None,
        }
    }

    fn read(&self) -> Stored {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Stored::Missing,
            Err(e) => {
                log::warn!("Failed to read persisted filters '{}': {e}", self.key);
                return Stored::Unavailable;
            }
        };
        match serde_json::from_str::<Vec<FilterDescriptor>>(&raw) {
            Ok(list) => Stored::List(list),
            Err(e) => {
                log::debug!("Ignoring malformed persisted filters '{}': {e}", self.key);
                Stored::Missing
            }
        }
    }

    /// Replace `filters` with the stored list, at most once per key.
    pub fn hydrate(&mut self, filters: &mut FilterStore) -> Hydration {
        if self.is_hydrated() {
            return Hydration::Skipped;
        }
        self.hydrated_key = Some(self.key.clone());

        match self.read() {
            Stored::List(list) => {
                log::debug!(
                    "Hydrated {} filter(s) from '{}'",
                    list.len(),
                    self.key
                );
                filters.set_all(list);
                Hydration::Restored
            }
            Stored::Missing => Hydration::Missing,
            Stored::Unavailable => Hydration::Unavailable,
        }
    }

    /// Write the list through. An empty list removes the key entirely.
    pub fn persist(&self, filters: &[FilterDescriptor]) {
        let result: Result<()> = if filters.is_empty() {
            self.storage.remove(&self.key)
        } else {
            match serde_json::to_string(filters) {
                Ok(json) => self.storage.set(&self.key, &json),
                Err(e) => Err(e.into()),
            }
        };
        if let Err(e) = result {
            log::warn!("Failed to persist filters '{}': {e}", self.key);
        }
    }
}

impl std::fmt::Debug for FilterPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPersistence")
            .field("key", &self.key)
            .field("hydrated_key", &self.hydrated_key)
            .finish()
    }
}

/// Both side effects of a filter change: write-through persistence and the
/// debounced outward notification. Either may be absent.
#[derive(Default)]
pub struct FilterSync {
    persistence: Option<FilterPersistence>,
    notifier: Option<Debouncer<Vec<FilterDescriptor>>>,
}

impl FilterSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_persistence(mut self, persistence: FilterPersistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn with_notifier<F>(mut self, delay: Duration, on_change: F) -> Self
    where
        F: Fn(Vec<FilterDescriptor>) + Send + 'static,
    {
        self.notifier = Some(Debouncer::new(delay, on_change));
        self
    }

    pub fn persistence(&self) -> Option<&FilterPersistence> {
        self.persistence.as_ref()
    }

    pub fn persistence_mut(&mut self) -> Option<&mut FilterPersistence> {
        self.persistence.as_mut()
    }

    /// Hydrate from storage if a key is configured and not yet read.
    pub fn hydrate(&mut self, filters: &mut FilterStore) -> Hydration {
        match self.persistence.as_mut() {
            Some(persistence) => persistence.hydrate(filters),
            None => Hydration::Skipped,
        }
    }

    /// Write the current list without notifying.
    pub fn persist(&self, filters: &[FilterDescriptor]) {
        if let Some(persistence) = &self.persistence {
            persistence.persist(filters);
        }
    }

    /// Run every side effect of a committed change.
    pub fn changed(&self, filters: &[FilterDescriptor]) {
        self.persist(filters);
        if let Some(notifier) = &self.notifier {
            notifier.arm(filters.to_vec());
        }
    }

    /// Fire a pending notification right away.
    pub fn flush(&self) {
        if let Some(notifier) = &self.notifier {
            notifier.flush();
        }
    }

    pub fn is_notify_pending(&self) -> bool {
        self.notifier
            .as_ref()
            .map(Debouncer::is_pending)
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for FilterSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSync")
            .field("persistence", &self.persistence)
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use crate::filter::FilterValue;
    use crate::storage::{MemoryStorage, SqliteStorage};
    use pretty_assertions::assert_eq;
    use std::sync::mpsc;

    /// Storage that fails every call, like a disabled or full browser store.
    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(GridError::Storage("storage disabled".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(GridError::Storage("quota exceeded".into()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(GridError::Storage("storage disabled".into()))
        }
    }

    fn sample_filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::new("name", FilterValue::text("Row 12")),
            FilterDescriptor::new("category", FilterValue::facets(["delta"])),
            FilterDescriptor::new("n", FilterValue::range(Some(5.0), Some(9.0))),
        ]
    }

    #[test]
    fn test_round_trip() {
        let storage = MemoryStorage::new();
        let persistence = FilterPersistence::new(Box::new(storage.clone()), "grid");

        persistence.persist(&sample_filters());
        assert_eq!(persistence.load(), Some(sample_filters()));
    }

    #[test]
    fn test_round_trip_sqlite() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("grid.db");

        let persistence =
            FilterPersistence::new(Box::new(SqliteStorage::open(&path).unwrap()), "grid");
        persistence.persist(&sample_filters());
        drop(persistence);

        let mut reopened =
            FilterPersistence::new(Box::new(SqliteStorage::open(&path).unwrap()), "grid");
        let mut store = FilterStore::new();
        assert_eq!(reopened.hydrate(&mut store), Hydration::Restored);
        assert_eq!(store.to_vec(), sample_filters());
    }

    #[test]
    fn test_empty_list_removes_key() {
        let storage = MemoryStorage::new();
        let persistence = FilterPersistence::new(Box::new(storage.clone()), "grid");

        persistence.persist(&sample_filters());
        persistence.persist(&[]);
        assert_eq!(storage.get("grid").unwrap(), None);
        assert_eq!(persistence.load(), None);
    }

    #[test]
    fn test_hydrate_runs_once_per_key() {
        let storage = MemoryStorage::new();
        storage
            .set("a", &serde_json::to_string(&sample_filters()).unwrap())
            .unwrap();
        let mut persistence = FilterPersistence::new(Box::new(storage.clone()), "a");

        let mut store = FilterStore::new();
        assert_eq!(persistence.hydrate(&mut store), Hydration::Restored);
        assert_eq!(store.len(), 3);

        store.clear();
        assert_eq!(persistence.hydrate(&mut store), Hydration::Skipped);
        assert!(store.is_empty());

        storage
            .set("b", r#"[{"id":"x","value":"y"}]"#)
            .unwrap();
        persistence.set_key("b");
        assert!(!persistence.is_hydrated());
        assert_eq!(persistence.hydrate(&mut store), Hydration::Restored);
        assert_eq!(store.get("x"), Some(&FilterValue::text("y")));
    }

    #[test]
    fn test_malformed_payload_ignored() {
        let storage = MemoryStorage::new();
        let mut store = FilterStore::new();
        store.upsert("initial", FilterValue::text("keep"));

        for payload in ["not json", r#"{"id":"x"}"#, r#"[{"id":"x","value":7}]"#] {
            storage.set("grid", payload).unwrap();
            let mut persistence = FilterPersistence::new(Box::new(storage.clone()), "grid");
            assert_eq!(persistence.hydrate(&mut store), Hydration::Missing);
            assert_eq!(store.get("initial"), Some(&FilterValue::text("keep")));
        }
    }

    #[test]
    fn test_storage_failures_swallowed() {
        let mut persistence = FilterPersistence::new(Box::new(BrokenStorage), "grid");
        let mut store = FilterStore::from(sample_filters());

        assert_eq!(persistence.hydrate(&mut store), Hydration::Unavailable);
        persistence.persist(store.as_slice());
        persistence.persist(&[]);
        assert_eq!(store.to_vec(), sample_filters());
    }

    #[test]
    fn test_sync_notifies_debounced_with_latest_list() {
        let (tx, rx) = mpsc::channel();
        let storage = MemoryStorage::new();
        let sync = FilterSync::new()
            .with_persistence(FilterPersistence::new(Box::new(storage.clone()), "grid"))
            .with_notifier(Duration::from_millis(50), move |list| {
                let _ = tx.send(list);
            });

        let mut store = FilterStore::new();
        store.upsert("name", FilterValue::text("R"));
        sync.changed(store.as_slice());
        store.upsert("name", FilterValue::text("Row"));
        sync.changed(store.as_slice());
        assert!(sync.is_notify_pending());

        let notified = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(notified, store.to_vec());
        assert!(rx.recv_timeout(Duration::from_millis(150)).is_err());

        // Persistence is immediate, not debounced
        let stored = storage.get("grid").unwrap().unwrap();
        assert_eq!(
            serde_json::from_str::<Vec<FilterDescriptor>>(&stored).unwrap(),
            store.to_vec()
        );
    }
}
