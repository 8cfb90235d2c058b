//! Bounded, most-recent-first history lists

use crate::error::{Result, ResumatchError};
use crate::interview::InterviewSession;
use crate::processing::pipeline::AnalysisRecord;
use crate::storage::{FileBackend, MemoryBackend, StorageBackend};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

/// Oldest entries are evicted beyond this many
pub const MAX_HISTORY_ENTRIES: usize = 20;

pub const ANALYSIS_KEY: &str = "resumatch_history";
pub const INTERVIEW_KEY: &str = "resumatch_interviews";

/// Anything that can live in a history list
pub trait HistoryEntry: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> &str;
}

/// A list persisted as one JSON array under a single key.
///
/// Every mutation rewrites the whole list. Read-modify-write is not
/// transactional; concurrent writers against the same backend can lose
/// updates.
pub struct HistoryStore<T> {
    backend: Arc<dyn StorageBackend>,
    key: String,
    _entry: PhantomData<fn() -> T>,
}

impl<T> Clone for HistoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            key: self.key.clone(),
            _entry: PhantomData,
        }
    }
}

impl<T: HistoryEntry> HistoryStore<T> {
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            _entry: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persisted list, failing with `StorageRead` if it cannot be read or parsed
    pub fn load(&self) -> Result<Vec<T>> {
        let raw = match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(Vec::new()),
            Err(ResumatchError::StorageRead(msg)) => return Err(ResumatchError::StorageRead(msg)),
            Err(e) => return Err(ResumatchError::StorageRead(e.to_string())),
        };

        let mut entries: Vec<T> = serde_json::from_str(&raw).map_err(|e| {
            ResumatchError::StorageRead(format!("Corrupt history under '{}': {}", self.key, e))
        })?;
        entries.truncate(MAX_HISTORY_ENTRIES);
        Ok(entries)
    }

    /// Entries newest first; unreadable state is treated as empty
    pub fn list(&self) -> Vec<T> {
        match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring unreadable history '{}': {}", self.key, e);
                Vec::new()
            }
        }
    }

    /// Prepend `entry`, evicting the oldest beyond [`MAX_HISTORY_ENTRIES`]
    pub fn append(&self, entry: T) -> Result<()> {
        let id = entry.id().to_string();
        let mut entries = self.list();
        entries.insert(0, entry);
        entries.truncate(MAX_HISTORY_ENTRIES);
        self.persist(&entries)?;
        info!("Saved '{}' to {} ({} entries)", id, self.key, entries.len());
        Ok(())
    }

    /// Drop the entry with `id` and return what remains
    pub fn remove(&self, id: &str) -> Result<Vec<T>> {
        let entries: Vec<T> = self.list().into_iter().filter(|e| e.id() != id).collect();
        self.persist(&entries)?;
        Ok(entries)
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.list().into_iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, entries: &[T]) -> Result<()> {
        let content = serde_json::to_string(entries)?;
        self.backend.write(&self.key, &content)
    }
}

/// The two history lists kept side by side on one backend
#[derive(Clone)]
pub struct History {
    pub analyses: HistoryStore<AnalysisRecord>,
    pub interviews: HistoryStore<InterviewSession>,
}

impl History {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            analyses: HistoryStore::new(Arc::clone(&backend), ANALYSIS_KEY),
            interviews: HistoryStore::new(backend, INTERVIEW_KEY),
        }
    }

    /// File-backed history in `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        Ok(Self::new(Arc::new(FileBackend::new(dir)?)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: String,
        n: usize,
    }

    impl HistoryEntry for Entry {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn entry(n: usize) -> Entry {
        Entry {
            id: format!("id-{}", n),
            n,
        }
    }

    fn store() -> (Arc<MemoryBackend>, HistoryStore<Entry>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = HistoryStore::new(backend.clone() as Arc<dyn StorageBackend>, "test");
        (backend, store)
    }

    #[test]
    fn test_empty_store() {
        let (_, store) = store();
        assert!(store.list().is_empty());
        assert!(store.is_empty());
        assert_eq!(store.get("id-1"), None);
    }

    #[test]
    fn test_append_is_newest_first() {
        let (_, store) = store();
        store.append(entry(1)).unwrap();
        store.append(entry(2)).unwrap();

        let ids: Vec<usize> = store.list().iter().map(|e| e.n).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_capacity_keeps_twenty_most_recent() {
        let (_, store) = store();
        for n in 0..25 {
            store.append(entry(n)).unwrap();
        }

        let list = store.list();
        assert_eq!(list.len(), MAX_HISTORY_ENTRIES);
        let ns: Vec<usize> = list.iter().map(|e| e.n).collect();
        let expected: Vec<usize> = (5..25).rev().collect();
        assert_eq!(ns, expected);
    }

    #[test]
    fn test_remove_preserves_order() {
        let (_, store) = store();
        for n in 0..5 {
            store.append(entry(n)).unwrap();
        }

        let remaining = store.remove("id-2").unwrap();
        let ns: Vec<usize> = remaining.iter().map(|e| e.n).collect();
        assert_eq!(ns, vec![4, 3, 1, 0]);
        assert_eq!(store.list(), remaining);

        // Unknown id leaves the list as is
        assert_eq!(store.remove("missing").unwrap().len(), 4);
    }

    #[test]
    fn test_get() {
        let (_, store) = store();
        store.append(entry(7)).unwrap();
        assert_eq!(store.get("id-7"), Some(entry(7)));
    }

    #[test]
    fn test_corrupt_state_is_empty() {
        let (backend, store) = store();
        backend.write("test", "{not json").unwrap();

        assert!(matches!(store.load(), Err(ResumatchError::StorageRead(_))));
        assert!(store.list().is_empty());

        // Appending replaces the corrupt state
        store.append(entry(1)).unwrap();
        assert_eq!(store.list(), vec![entry(1)]);
    }

    #[test]
    fn test_oversized_state_truncated_on_read() {
        let (backend, store) = store();
        let many: Vec<Entry> = (0..30).map(entry).collect();
        backend
            .write("test", &serde_json::to_string(&many).unwrap())
            .unwrap();

        assert_eq!(store.list().len(), MAX_HISTORY_ENTRIES);
    }

    #[test]
    fn test_history_keys_are_independent() {
        let history = History::in_memory();
        assert_eq!(history.analyses.key(), ANALYSIS_KEY);
        assert_eq!(history.interviews.key(), INTERVIEW_KEY);
        assert!(history.analyses.list().is_empty());
        assert!(history.interviews.list().is_empty());
    }
}
