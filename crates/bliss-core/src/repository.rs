//! Selection over a loaded passage collection.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::defaults::embedded_collection;
use crate::filter::PassageFilter;
use crate::hash::daily_index;
use crate::passage::{Passage, PassageCollection};
use crate::quote::Quote;

/// Aggregate counts over the active collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub by_source: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
}

/// Read-only passage pool. `degraded` marks the embedded defaults standing
/// in for a collection that failed to load.
#[derive(Clone, Debug)]
pub struct PassageRepository {
    collection: PassageCollection,
    degraded: bool,
}

impl PassageRepository {
    pub fn new(collection: PassageCollection) -> Self {
        Self {
            collection,
            degraded: false,
        }
    }

    pub fn embedded() -> Self {
        Self {
            collection: embedded_collection(),
            degraded: true,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn collection(&self) -> &PassageCollection {
        &self.collection
    }

    pub fn passages(&self) -> &[Passage] {
        &self.collection.passages
    }

    pub fn len(&self) -> usize {
        self.collection.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.passages.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Passage> {
        self.collection.passages.iter().find(|p| p.id == id)
    }

    /// Uniform pick from the filtered pool. A filter that matches nothing is
    /// discarded. `None` only for an empty collection.
    pub fn random<R: Rng + ?Sized>(&self, filter: &PassageFilter, rng: &mut R) -> Option<Quote> {
        let (pool, _) = filter.apply(&self.collection.passages);
        pool.choose(rng).map(|p| Quote::from(*p))
    }

    /// The passage for a calendar day key, e.g. `"Tue Jan 01 2030"`.
    pub fn daily(&self, date_key: &str) -> Option<Quote> {
        if self.is_empty() {
            return None;
        }
        let idx = daily_index(date_key, self.len());
        Some(Quote::from(&self.collection.passages[idx]).into_daily())
    }

    /// Case-insensitive substring match over text, source and tags, in
    /// collection order. A blank term matches nothing.
    pub fn search(&self, term: &str) -> Vec<&Passage> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.collection
            .passages
            .iter()
            .filter(|p| {
                p.text.to_lowercase().contains(&needle)
                    || p.source.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn stats(&self) -> CollectionStats {
        let mut stats = CollectionStats {
            total: self.len(),
            ..CollectionStats::default()
        };
        for p in &self.collection.passages {
            *stats.by_source.entry(p.source.clone()).or_default() += 1;
            *stats.by_category.entry(p.category.clone()).or_default() += 1;
        }
        stats
    }

    /// Declared sources, or the distinct passage sources when none are declared.
    pub fn sources(&self) -> Vec<String> {
        if !self.collection.sources.is_empty() {
            return self.collection.sources.clone();
        }
        self.stats().by_source.into_keys().collect()
    }

    /// Declared categories, or the distinct passage categories.
    pub fn categories(&self) -> Vec<String> {
        if !self.collection.categories.is_empty() {
            return self.collection.categories.clone();
        }
        self.stats()
            .by_category
            .into_keys()
            .filter(|c| !c.is_empty())
            .collect()
    }
}
