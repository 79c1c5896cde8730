//! Result caching for compensation breakdowns.
//!
//! Recomputing a breakdown over a large date range is pure but not free;
//! the cache memoizes results per (teacher, period) with explicit
//! invalidation. Entries are immutable once written: a refresh is always
//! invalidate-then-recompute, so concurrent readers never observe a
//! partially-updated breakdown.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;

use crate::models::CompensationBreakdown;

/// Typed cache key: teacher plus both endpoints of the inclusive period.
///
/// Both endpoints are part of the key, so a partial-month request never
/// collides with a full-month one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// The teacher the entry is for.
    pub teacher_id: String,
    /// Period start (inclusive).
    pub start_date: NaiveDate,
    /// Period end (inclusive).
    pub end_date: NaiveDate,
}

/// In-memory cache of compensation breakdowns.
///
/// Safe for concurrent use: reads share an `RwLock` read guard, and
/// concurrent writers for the same key are last-write-wins, which is
/// harmless because recomputation is deterministic.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<CacheKey, Arc<CompensationBreakdown>>>,
}

impl ResultCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cached breakdown.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<CompensationBreakdown>> {
        self.read_entries().get(key).cloned()
    }

    /// Stores a breakdown and returns the shared handle to it.
    pub fn put(&self, key: CacheKey, breakdown: CompensationBreakdown) -> Arc<CompensationBreakdown> {
        let entry = Arc::new(breakdown);
        self.write_entries().insert(key, Arc::clone(&entry));
        entry
    }

    /// Removes every entry for one teacher. Returns the number removed.
    pub fn invalidate_teacher(&self, teacher_id: &str) -> usize {
        let mut entries = self.write_entries();
        let before = entries.len();
        entries.retain(|key, _| key.teacher_id != teacher_id);
        before - entries.len()
    }

    /// Removes every entry. Returns the number removed.
    pub fn invalidate_all(&self) -> usize {
        let mut entries = self.write_entries();
        let count = entries.len();
        entries.clear();
        count
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    fn read_entries(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<CacheKey, Arc<CompensationBreakdown>>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_entries(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<CacheKey, Arc<CompensationBreakdown>>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
