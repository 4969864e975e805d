//! Validity templates: which slots of a composite instance draw valid or invalid values.
//!
//! Rather than the cross product of every slot's pool, a composite is built for a few templates
//! only: all slots valid, all slots invalid, and one invalid slot at a time.
use super::InstancePool;
use crate::error::GenerationError;
use ahash::AHashMap;
use serde_json::Value;
use std::{hash::Hash, sync::Arc};

/// Per-slot validity choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ValidityTemplate(Vec<bool>);

impl ValidityTemplate {
    pub(crate) fn is_all_valid(&self) -> bool {
        self.0.iter().all(|valid| *valid)
    }
}

/// Cursors that cycle through each pool so consecutive draws differ.
#[derive(Debug, Default)]
pub(crate) struct RoundRobin {
    cursors: AHashMap<(usize, bool), usize>,
}

impl RoundRobin {
    fn next<'p>(&mut self, pool_index: usize, pool: &'p InstancePool, valid: bool) -> Option<&'p Value> {
        let candidates = pool.pick(valid);
        if candidates.is_empty() {
            return None;
        }
        let cursor = self.cursors.entry((pool_index, valid)).or_insert(0);
        let value = &candidates[*cursor % candidates.len()];
        *cursor += 1;
        Some(value)
    }
}

/// Slots of a composite instance, each bound to a pool shared by slots with the same key.
#[derive(Debug)]
pub(crate) struct Slots<K> {
    index: AHashMap<K, usize>,
    pools: Vec<Arc<InstancePool>>,
    slots: Vec<usize>,
}

impl<K: Hash + Eq> Slots<K> {
    pub(crate) fn new() -> Slots<K> {
        Slots {
            index: AHashMap::new(),
            pools: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Append a slot whose pool is identified by `key`; `pool` is only called for new keys.
    pub(crate) fn push(
        &mut self,
        key: K,
        pool: impl FnOnce() -> Result<Arc<InstancePool>, GenerationError>,
    ) -> Result<(), GenerationError> {
        let pool_index = match self.index.get(&key) {
            Some(pool_index) => *pool_index,
            None => {
                let pool_index = self.pools.len();
                self.pools.push(pool()?);
                self.index.insert(key, pool_index);
                pool_index
            }
        };
        self.slots.push(pool_index);
        Ok(())
    }

    /// All valid, all invalid, and every slot flipped to invalid on its own.
    pub(crate) fn templates(&self) -> Vec<ValidityTemplate> {
        let mut templates = vec![
            ValidityTemplate(vec![true; self.slots.len()]),
            ValidityTemplate(vec![false; self.slots.len()]),
        ];
        for position in 0..self.slots.len() {
            let mut flags = vec![true; self.slots.len()];
            flags[position] = false;
            templates.push(ValidityTemplate(flags));
        }
        templates.dedup();
        templates
    }

    /// One value per slot, drawn as the template says; `None` if a slot's pool is empty.
    pub(crate) fn instantiate(
        &self,
        template: &ValidityTemplate,
        round_robin: &mut RoundRobin,
    ) -> Option<Vec<Value>> {
        self.slots
            .iter()
            .zip(&template.0)
            .map(|(pool_index, valid)| {
                round_robin
                    .next(*pool_index, &self.pools[*pool_index], *valid)
                    .cloned()
            })
            .collect()
    }
}
