use common::models::Timezone;
use std::collections::HashMap;

struct CacheEntry {
    query: String,
    region: Option<String>,
    results: Vec<Timezone>,
    last_accessed: u64,
}

/// Bounded search-result cache with least-recently-accessed eviction.
///
/// Access order is tracked with a logical clock rather than wall time so two
/// reads in the same instant still have a defined order.
pub struct SearchCache {
    entries: HashMap<String, CacheEntry>,
    max_size: usize,
    clock: u64,
}

impl SearchCache {
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_size: max_size.max(1),
            clock: 0,
        }
    }

    /// Composite key for a normalized query and optional region
    pub fn key(query: &str, region: Option<&str>) -> String {
        format!("{}|{}", query, region.unwrap_or(""))
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Full cached result set; refreshes the entry's access time
    pub fn get(&mut self, key: &str) -> Option<&[Timezone]> {
        let now = self.tick();
        let entry = self.entries.get_mut(key)?;
        entry.last_accessed = now;
        Some(entry.results.as_slice())
    }

    pub fn insert(
        &mut self,
        query: impl Into<String>,
        region: Option<String>,
        results: Vec<Timezone>,
    ) {
        let query = query.into();
        let key = Self::key(&query, region.as_deref());

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            self.evict_least_recent();
        }

        let now = self.tick();
        self.entries.insert(
            key,
            CacheEntry {
                query,
                region,
                results,
                last_accessed: now,
            },
        );
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }

    /// Drop every entry whose (query, region) satisfies `predicate`; returns the count removed
    pub fn invalidate_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&str, Option<&str>) -> bool,
    {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !predicate(&entry.query, entry.region.as_deref()));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
