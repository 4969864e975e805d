use super::InstancePool;
use crate::{options::GenerationOptions, paths::Location};
use ahash::AHashMap;
use serde::Serialize;
use std::{sync::Arc, time::Duration};

/// Generation figures for one subschema of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubschemaStatistics {
    /// Stable identifier of the subschema, a URI fragment such as `#/items/0`.
    pub id: String,
    /// Number of instances generated for it.
    pub instances: usize,
    /// Time spent generating them.
    pub duration: Duration,
    /// Number of times the instances were reused.
    pub hits: u64,
}

#[derive(Debug)]
struct CacheEntry {
    pool: Arc<InstancePool>,
    duration: Duration,
    hits: u64,
}

/// Pools of every subschema generated so far, keyed by the subschema location.
///
/// Each location is one occurrence in the document, so identical subschemas at different
/// places are cached separately.
#[derive(Debug, Default)]
pub(crate) struct GenerationCache {
    entries: AHashMap<Location, CacheEntry>,
    order: Vec<Location>,
    limits: Option<(usize, usize)>,
}

impl GenerationCache {
    /// Forget everything if the cache was filled under different limits.
    pub(crate) fn prepare(&mut self, options: &GenerationOptions) {
        let limits = (options.max_string_length(), options.max_collection_size());
        if self.limits != Some(limits) {
            self.clear();
            self.limits = Some(limits);
        }
    }

    pub(crate) fn get(&mut self, location: &Location) -> Option<Arc<InstancePool>> {
        self.entries.get_mut(location).map(|entry| {
            entry.hits += 1;
            Arc::clone(&entry.pool)
        })
    }

    pub(crate) fn insert(&mut self, location: Location, pool: Arc<InstancePool>, duration: Duration) {
        if self
            .entries
            .insert(location.clone(), CacheEntry { pool, duration, hits: 0 })
            .is_none()
        {
            self.order.push(location);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.limits = None;
    }

    /// Figures for every cached subschema, in the order they were first generated.
    pub(crate) fn statistics(&self) -> Vec<SubschemaStatistics> {
        self.order
            .iter()
            .filter_map(|location| {
                self.entries.get(location).map(|entry| SubschemaStatistics {
                    id: format!("#{location}"),
                    instances: entry.pool.len(),
                    duration: entry.duration,
                    hits: entry.hits,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerationOptions;

    #[test]
    fn hits_are_counted() {
        let mut cache = GenerationCache::default();
        let location = Location::new().join("items");
        cache.insert(location.clone(), Arc::new(InstancePool::default()), Duration::from_millis(1));
        assert!(cache.get(&location).is_some());
        assert!(cache.get(&location).is_some());
        assert!(cache.get(&Location::new()).is_none());
        let statistics = cache.statistics();
        assert_eq!(statistics.len(), 1);
        assert_eq!(statistics[0].id, "#/items");
        assert_eq!(statistics[0].hits, 2);
        assert_eq!(statistics[0].instances, 0);
    }

    #[test]
    fn reset_when_limits_change() {
        let mut cache = GenerationCache::default();
        let mut options = GenerationOptions::default();
        cache.prepare(&options);
        cache.insert(Location::new(), Arc::new(InstancePool::default()), Duration::ZERO);
        cache.prepare(&options);
        assert_eq!(cache.len(), 1);
        options.with_max_string_length(8);
        cache.prepare(&options);
        assert_eq!(cache.len(), 0);
    }
}
