use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of strategy counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub network_fetches: u64,
    pub network_failures: u64,
    /// Navigations answered from a fallback key.
    pub fallbacks_served: u64,
    /// Synthesized responses (offline notice or empty asset failure).
    pub synthesized: u64,
    pub stores: u64,
    pub store_errors: u64,
}

impl StrategyStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
pub(crate) struct AtomicStats {
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub network_fetches: AtomicU64,
    pub network_failures: AtomicU64,
    pub fallbacks_served: AtomicU64,
    pub synthesized: AtomicU64,
    pub stores: AtomicU64,
    pub store_errors: AtomicU64,
}

impl AtomicStats {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn to_stats(&self) -> StrategyStats {
        StrategyStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            network_fetches: self.network_fetches.load(Ordering::Relaxed),
            network_failures: self.network_failures.load(Ordering::Relaxed),
            fallbacks_served: self.fallbacks_served.load(Ordering::Relaxed),
            synthesized: self.synthesized.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
        }
    }
}
