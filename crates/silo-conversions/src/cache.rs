//! Memoization of resolved conversion targets.
//!
//! Lookups scan the registered pair sets linearly; this cache makes repeat
//! queries O(1). Two levels: an outer concurrent map keyed by the exact
//! source type, an inner one keyed by the requested target (`None` stands
//! for "no target requested"). The cached value is itself an
//! `Option<TypeKey>`: `None` records "resolved to no mapping", which is a
//! distinct state from "never computed".
//!
//! Races are tolerated, not prevented: two threads missing the same key may
//! both run the resolve function, and the atomic insert keeps whichever
//! lands first. The resolve functions are pure over the immutable pair
//! sets, so the duplicate work is harmless. Entries are never invalidated;
//! the registry owning the cache is immutable after construction.

use dashmap::DashMap;

use silo_core::TypeKey;

/// Two-level concurrent cache of resolved conversion targets.
#[derive(Debug, Default)]
pub(crate) struct ConversionTargetsCache {
    targets: DashMap<TypeKey, TargetTypes>,
}

impl ConversionTargetsCache {
    pub(crate) fn new() -> Self {
        ConversionTargetsCache::default()
    }

    /// Get or compute the resolved target for (source, requested target).
    pub(crate) fn compute_if_absent<F>(
        &self,
        source: TypeKey,
        target: Option<TypeKey>,
        resolve: F,
    ) -> Option<TypeKey>
    where
        F: FnOnce(TypeKey, Option<TypeKey>) -> Option<TypeKey>,
    {
        if let Some(entry) = self.targets.get(&source) {
            return entry.compute_if_absent(target, resolve);
        }
        self.targets
            .entry(source)
            .or_insert_with(|| TargetTypes::new(source))
            .compute_if_absent(target, resolve)
    }
}

/// Resolved targets for one source type.
#[derive(Debug)]
struct TargetTypes {
    source: TypeKey,
    targets: DashMap<Option<TypeKey>, Option<TypeKey>>,
}

impl TargetTypes {
    fn new(source: TypeKey) -> Self {
        TargetTypes {
            source,
            targets: DashMap::new(),
        }
    }

    fn compute_if_absent<F>(&self, target: Option<TypeKey>, resolve: F) -> Option<TypeKey>
    where
        F: FnOnce(TypeKey, Option<TypeKey>) -> Option<TypeKey>,
    {
        if let Some(cached) = self.targets.get(&target) {
            return *cached;
        }
        let resolved = resolve(self.source, target);
        // First write wins under a race; return what the map retained.
        *self.targets.entry(target).or_insert(resolved)
    }
}
