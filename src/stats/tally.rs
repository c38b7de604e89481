use std::collections::HashMap;

/// One accumulator slot: the grouping key, display metadata captured when
/// the key was seeded, and the running counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<M, C> {
    pub key: String,
    pub meta: M,
    pub counts: C,
}

/// Accumulator map for one aggregation pass.
///
/// Keys come from the primary collection via [`Tally::seed`]; secondary
/// documents can only increment keys that were seeded. References to
/// unknown keys are dropped and counted in [`Tally::dangling`].
#[derive(Debug, Clone)]
pub struct Tally<M, C> {
    entries: HashMap<String, Entry<M, C>>,
    dangling: usize,
}

impl<M, C: Default> Default for Tally<M, C> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            dangling: 0,
        }
    }
}

impl<M, C: Default> Tally<M, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` with zeroed counters. The first seed wins; returns false
    /// when the key already existed and its metadata was kept.
    pub fn seed(&mut self, key: impl Into<String>, meta: M) -> bool {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(
            key.clone(),
            Entry {
                key,
                meta,
                counts: C::default(),
            },
        );
        true
    }

    /// Apply `update` to the counters of `key` if it was seeded.
    pub fn record<F: FnOnce(&mut C)>(&mut self, key: &str, update: F) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                update(&mut entry.counts);
                true
            }
            None => {
                self.dangling += 1;
                false
            }
        }
    }

    /// Like [`Tally::record`] for documents whose reference may be absent.
    pub fn record_ref<F: FnOnce(&mut C)>(&mut self, key: Option<&str>, update: F) -> bool {
        match key {
            Some(key) => self.record(key, update),
            None => {
                self.dangling += 1;
                false
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Entry<M, C>> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Secondary references that did not resolve to a seeded key.
    pub fn dangling(&self) -> usize {
        self.dangling
    }

    pub fn warn_dangling(&self, what: &str) {
        if self.dangling > 0 {
            log::warn!("{what}: skipped {} unresolved references", self.dangling);
        }
    }

    /// All entries ordered by key.
    pub fn into_sorted_entries(self) -> Vec<Entry<M, C>> {
        let mut entries: Vec<_> = self.entries.into_values().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// Entries with a non-zero `metric`, highest first, ties by key, at most `limit`.
    pub fn rank_by<F>(self, metric: F, limit: usize) -> Vec<Entry<M, C>>
    where
        F: Fn(&C) -> u64,
    {
        let mut ranked: Vec<_> = self
            .entries
            .into_values()
            .filter(|e| metric(&e.counts) > 0)
            .collect();
        ranked.sort_by(|a, b| {
            metric(&b.counts)
                .cmp(&metric(&a.counts))
                .then_with(|| a.key.cmp(&b.key))
        });
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seed_keeps_metadata() {
        let mut tally: Tally<&str, u64> = Tally::new();
        assert!(tally.seed("a", "first"));
        assert!(!tally.seed("a", "second"));
        assert_eq!(tally.get("a").unwrap().meta, "first");
        assert_eq!(tally.len(), 1);
    }

    #[test]
    fn missing_reference_counts_as_dangling() {
        let mut tally: Tally<(), u64> = Tally::new();
        tally.seed("a", ());
        assert!(!tally.record_ref(None, |c| *c += 1));
        assert!(tally.record_ref(Some("a"), |c| *c += 1));
        assert_eq!(tally.dangling(), 1);
        assert_eq!(tally.get("a").unwrap().counts, 1);
    }
}
