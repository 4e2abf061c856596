use super::stats::{AtomicStats, StrategyStats};
use crate::cache::{CacheKey, CacheStorage, GenerationId, StorageError};
use crate::config::WorkerConfig;
use crate::transport::{fetch_with_timeout, FetchError, Fetcher};
use crate::types::{Request, Response};
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};
use url::{Origin, Url};

/// Shared state of both strategies: the active generation, the network, and
/// the tracker for background writes.
///
/// The generation is fixed at construction. A context never reads from or
/// writes to any other generation.
pub struct StrategyContext {
    config: Arc<WorkerConfig>,
    generation: GenerationId,
    site: Option<Origin>,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    tracker: TaskTracker,
    stats: Arc<AtomicStats>,
}

impl StrategyContext {
    pub fn new(
        config: Arc<WorkerConfig>,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let generation = config.generation_id();
        let site = config
            .origin
            .as_deref()
            .and_then(|o| Url::parse(o).ok())
            .map(|u| u.origin());
        Self {
            config,
            generation,
            site,
            storage,
            fetcher,
            tracker: TaskTracker::new(),
            stats: Arc::new(AtomicStats::default()),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn generation(&self) -> &GenerationId {
        &self.generation
    }

    /// Origin of the site, when configured.
    pub fn site_origin(&self) -> Option<&Origin> {
        self.site.as_ref()
    }

    pub fn key_for(&self, request: &Request) -> CacheKey {
        CacheKey::for_request_on(request, self.site.as_ref())
    }

    /// Look a key up in the active generation, counting a hit or a miss.
    ///
    /// Storage errors are logged and treated as a miss.
    pub async fn lookup(&self, key: &CacheKey) -> Option<Response> {
        let found = self.probe(key).await;
        let counter = match found {
            Some(_) => &self.stats.cache_hits,
            None => &self.stats.cache_misses,
        };
        AtomicStats::incr(counter);
        found
    }

    /// Lookup for a navigation fallback key. Not counted as a hit or miss.
    pub async fn lookup_fallback(&self, key: &CacheKey) -> Option<Response> {
        self.probe(key).await
    }

    async fn probe(&self, key: &CacheKey) -> Option<Response> {
        match self.try_lookup(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!(key = %key, error = %e, "cache lookup failed; treating as miss");
                None
            }
        }
    }

    async fn try_lookup(&self, key: &CacheKey) -> Result<Option<Response>, StorageError> {
        let name = self.generation.as_str();
        if !self.storage.has(name).await? {
            return Ok(None);
        }
        self.storage.open(name).await?.match_key(key).await
    }

    pub async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        AtomicStats::incr(&self.stats.network_fetches);
        let result =
            fetch_with_timeout(self.fetcher.as_ref(), request, self.config.fetch_timeout).await;
        if let Err(ref e) = result {
            AtomicStats::incr(&self.stats.network_failures);
            warn!(url = %request.url, error = %e, "network fetch failed");
        }
        result
    }

    /// Write a copy of a successful response in the background.
    ///
    /// Non-success responses are not stored. Write failures are logged and dropped.
    pub fn persist(&self, key: CacheKey, response: Response) {
        if !response.is_success() {
            debug!(key = %key, status = %response.status, "not caching non-success response");
            return;
        }
        let storage = self.storage.clone();
        let name = self.generation.to_string();
        let stats = self.stats.clone();
        self.tracker.spawn(async move {
            match store(storage.as_ref(), &name, &key, response).await {
                Ok(true) => {
                    AtomicStats::incr(&stats.stores);
                    debug!(generation = %name, key = %key, "cached response");
                }
                Ok(false) => {
                    debug!(generation = %name, key = %key, "generation removed; write dropped");
                }
                Err(e) => {
                    AtomicStats::incr(&stats.store_errors);
                    warn!(generation = %name, key = %key, error = %e, "background cache write failed");
                }
            }
        });
    }

    pub(crate) fn count_fallback(&self) {
        AtomicStats::incr(&self.stats.fallbacks_served);
    }

    pub(crate) fn count_synthesized(&self) {
        AtomicStats::incr(&self.stats.synthesized);
    }

    /// Number of background writes still running.
    pub fn pending_writes(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every background write spawned so far has finished.
    pub async fn flush(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    pub fn stats(&self) -> StrategyStats {
        self.stats.to_stats()
    }
}

// Returns false when the generation no longer exists, so a superseded
// context cannot resurrect a deleted generation.
async fn store(
    storage: &dyn CacheStorage,
    name: &str,
    key: &CacheKey,
    response: Response,
) -> Result<bool, StorageError> {
    if !storage.has(name).await? {
        return Ok(false);
    }
    storage.open(name).await?.put(key, response).await?;
    Ok(true)
}
