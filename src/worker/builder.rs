use super::core::OfflineWorker;
use crate::cache::{CacheStorage, MemoryCacheStorage};
use crate::config::WorkerConfig;
use crate::lifecycle::{ClientHost, GenerationManager, NoopHost, WorkerState};
use crate::routing::RequestRouter;
use crate::strategy::StrategyContext;
use crate::transport::{Fetcher, HttpFetcher};
use crate::{Error, ErrorContext, Result};
use std::sync::{Arc, RwLock};

/// Builder for [`OfflineWorker`].
///
/// Only the network capability is required. Storage defaults to
/// [`MemoryCacheStorage`] and the host to [`NoopHost`].
pub struct OfflineWorkerBuilder {
    config: WorkerConfig,
    storage: Option<Arc<dyn CacheStorage>>,
    fetcher: Option<Arc<dyn Fetcher>>,
    // applied over whichever config is set last
    origin: Option<String>,
    host: Arc<dyn ClientHost>,
}

impl OfflineWorkerBuilder {
    pub fn new() -> Self {
        Self {
            config: WorkerConfig::default(),
            storage: None,
            fetcher: None,
            origin: None,
            host: Arc::new(NoopHost),
        }
    }

    pub fn config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn storage(mut self, storage: Arc<dyn CacheStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Use an [`HttpFetcher`] against `origin`, and record it as the site origin.
    pub fn origin_fetcher(mut self, origin: &str) -> Result<Self> {
        self.fetcher = Some(Arc::new(HttpFetcher::new(origin)?));
        self.origin = Some(origin.to_string());
        Ok(self)
    }

    pub fn host(mut self, host: Arc<dyn ClientHost>) -> Self {
        self.host = host;
        self
    }

    pub fn build(mut self) -> Result<OfflineWorker> {
        if let Some(origin) = self.origin.take() {
            self.config.origin = Some(origin);
        }
        self.config.validate()?;
        let fetcher = self.fetcher.ok_or_else(|| {
            Error::configuration_with_context(
                "a network fetcher is required",
                ErrorContext::new()
                    .with_field_path("fetcher")
                    .with_source("offline_worker_builder"),
            )
        })?;
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryCacheStorage::new()) as Arc<dyn CacheStorage>);
        let config = Arc::new(self.config);

        let manager = GenerationManager::new(
            config.clone(),
            storage.clone(),
            fetcher.clone(),
            self.host,
        );
        let ctx = Arc::new(StrategyContext::new(config.clone(), storage.clone(), fetcher));

        Ok(OfflineWorker {
            config,
            storage,
            manager,
            router: RequestRouter::new(ctx),
            state: RwLock::new(WorkerState::Parsed),
        })
    }
}

impl Default for OfflineWorkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubFetcher;

    #[test]
    fn test_build_requires_fetcher() {
        let err = OfflineWorkerBuilder::new().build().err().unwrap();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("fetcher")
        );
    }

    #[test]
    fn test_build_validates_config() {
        let err = OfflineWorkerBuilder::new()
            .config(WorkerConfig::default().with_namespace(""))
            .fetcher(Arc::new(StubFetcher::new()))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_origin_fetcher_sets_origin() {
        let worker = OfflineWorkerBuilder::new()
            .origin_fetcher("https://archaeology.world")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            worker.config().origin.as_deref(),
            Some("https://archaeology.world")
        );
        assert_eq!(worker.state(), WorkerState::Parsed);
        assert_eq!(worker.storage().backend_name(), "memory");
    }

    #[test]
    fn test_origin_survives_later_config() {
        let worker = OfflineWorkerBuilder::new()
            .origin_fetcher("https://archaeology.world")
            .unwrap()
            .config(WorkerConfig::default().with_version("v3"))
            .build()
            .unwrap();
        assert_eq!(
            worker.config().origin.as_deref(),
            Some("https://archaeology.world")
        );
        assert_eq!(worker.generation_id().as_str(), "archaeologyworld-v3");
    }
}
