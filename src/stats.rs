//! Run statistics shared between sorting workers.
//!
//! Workers record where every processed file ended up and which extensions
//! were recognized. All inserts go through a single lock; the aggregates are
//! only read back once the worker pool has finished.

use crate::file_category::Category;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Aggregated results of a sorting run.
///
/// Every aggregate is a set, so recording the same value twice is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Result paths per category.
    pub categories: HashMap<Category, BTreeSet<String>>,
    /// Extensions found in the category table.
    pub known: BTreeSet<String>,
    /// Extensions that fell through to [`Category::Other`].
    pub unknown: BTreeSet<String>,
}

impl Stats {
    /// Returns the paths recorded for a category, if any.
    pub fn paths(&self, category: Category) -> Option<&BTreeSet<String>> {
        self.categories.get(&category)
    }

    /// Total number of distinct result paths across all categories.
    pub fn total_paths(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }
}

/// Thread-safe store the workers write into.
#[derive(Debug, Default)]
pub struct StatsStore {
    inner: Mutex<Stats>,
}

impl StatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Each insert is a single set operation; a poisoned guard still holds
    // consistent data.
    fn lock(&self) -> MutexGuard<'_, Stats> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a result path under its category.
    pub fn record(&self, category: Category, path: impl Into<String>) {
        self.lock()
            .categories
            .entry(category)
            .or_default()
            .insert(path.into());
    }

    /// Records an extension that matched the category table.
    pub fn record_known(&self, ext: &str) {
        self.lock().known.insert(ext.to_string());
    }

    /// Records an extension that matched nothing.
    pub fn record_unknown(&self, ext: &str) {
        self.lock().unknown.insert(ext.to_string());
    }

    /// Returns a copy of the current aggregates.
    pub fn snapshot(&self) -> Stats {
        self.lock().clone()
    }

    /// Consumes the store and returns the aggregates.
    pub fn into_stats(self) -> Stats {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_record_deduplicates_paths() {
        let store = StatsStore::new();
        store.record(Category::Audio, "/root/audio/x.mp3");
        store.record(Category::Audio, "/root/audio/x.mp3");

        let stats = store.into_stats();
        assert_eq!(stats.paths(Category::Audio).map(BTreeSet::len), Some(1));
        assert_eq!(stats.total_paths(), 1);
    }

    #[test]
    fn test_known_and_unknown_are_separate() {
        let store = StatsStore::new();
        store.record_known(".txt");
        store.record_unknown(".xyz");
        store.record_unknown("");

        let stats = store.snapshot();
        assert!(stats.known.contains(".txt"));
        assert!(!stats.known.contains(".xyz"));
        assert!(stats.unknown.contains(".xyz"));
        assert!(stats.unknown.contains(""));
    }

    #[test]
    fn test_concurrent_inserts_are_not_lost() {
        let store = Arc::new(StatsStore::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100 {
                        store.record(Category::Documents, format!("/r/documents/{worker}_{i}.txt"));
                        store.record_known(".txt");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker panicked");
        }

        let stats = store.snapshot();
        assert_eq!(stats.total_paths(), 800);
        assert_eq!(stats.known.len(), 1);
    }
}
