//! Generation manager.

use super::ClientHost;
use crate::cache::{CacheKey, CacheStorage, GenerationId, StorageError};
use crate::config::WorkerConfig;
use crate::transport::{fetch_with_timeout, FetchError, Fetcher};
use crate::types::Request;
use crate::{Error, Result};
use futures::future::{join_all, try_join_all};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub generation: GenerationId,
    /// Essential resources stored, in list order.
    pub cached: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ActivationReport {
    /// The generation left active.
    pub retained: Option<GenerationId>,
    pub deleted: Vec<String>,
    /// Stale generations whose deletion failed; they are retried on the next activation.
    pub failed: Vec<(String, StorageError)>,
}

impl ActivationReport {
    pub fn all_deleted(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct GenerationManager {
    config: Arc<WorkerConfig>,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    host: Arc<dyn ClientHost>,
}

impl GenerationManager {
    pub fn new(
        config: Arc<WorkerConfig>,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        host: Arc<dyn ClientHost>,
    ) -> Self {
        Self {
            config,
            storage,
            fetcher,
            host,
        }
    }

    pub fn generation_id(&self) -> GenerationId {
        self.config.generation_id()
    }

    /// Populate the current generation with every essential resource.
    ///
    /// All resources are fetched before anything is stored: if one fetch fails
    /// or returns a non-success status, the install fails and the generation
    /// receives no entries.
    pub async fn install(&self) -> Result<InstallReport> {
        self.host.skip_waiting().await;

        let generation = self.generation_id();
        info!(
            generation = %generation,
            resources = self.config.essential_resources.len(),
            "installing cache generation"
        );
        let cache = self.storage.open(generation.as_str()).await?;

        let fetches = self
            .config
            .essential_resources
            .iter()
            .map(|path| self.fetch_essential(path));
        let fetched = try_join_all(fetches).await?;

        let mut cached = Vec::with_capacity(fetched.len());
        for (path, response) in fetched {
            cache.put(&CacheKey::get(&path), response).await?;
            cached.push(path);
        }

        info!(generation = %generation, cached = cached.len(), "cache generation installed");
        Ok(InstallReport { generation, cached })
    }

    async fn fetch_essential(&self, path: &str) -> Result<(String, crate::types::Response)> {
        let request = Request::get(path);
        let response = fetch_with_timeout(self.fetcher.as_ref(), &request, self.config.fetch_timeout)
            .await
            .map_err(|source| Error::Population {
                path: path.to_string(),
                source,
            })?;
        if !response.is_success() {
            return Err(Error::Population {
                path: path.to_string(),
                source: FetchError::Status(response.status.as_u16()),
            });
        }
        Ok((path.to_string(), response))
    }

    /// Delete every generation in the namespace except the current one.
    pub async fn activate(&self) -> Result<ActivationReport> {
        let current = self.generation_id();
        let namespace = self.config.namespace.as_str();

        let stale: Vec<String> = self
            .storage
            .keys()
            .await?
            .into_iter()
            .filter(|name| GenerationId::belongs_to(name, namespace) && name != current.as_str())
            .collect();

        let outcomes = join_all(stale.into_iter().map(|name| async move {
            let result = self.storage.delete(&name).await;
            (name, result)
        }))
        .await;

        let mut report = ActivationReport {
            retained: Some(current.clone()),
            ..Default::default()
        };
        for (name, result) in outcomes {
            match result {
                Ok(_) => report.deleted.push(name),
                Err(e) => {
                    warn!(generation = %name, error = %e, "failed to delete stale generation");
                    report.failed.push((name, e));
                }
            }
        }

        self.host.claim_clients().await;
        info!(
            generation = %current,
            deleted = ?report.deleted,
            failed = report.failed.len(),
            "cache generation activated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStorage;
    use crate::test_support::{RecordingHost, StubFetcher};
    use crate::types::Response;
    use reqwest::StatusCode;

    fn manager(
        config: WorkerConfig,
        storage: &MemoryCacheStorage,
        fetcher: StubFetcher,
        host: Arc<RecordingHost>,
    ) -> GenerationManager {
        GenerationManager::new(
            Arc::new(config),
            Arc::new(storage.clone()),
            Arc::new(fetcher),
            host,
        )
    }

    fn small_config() -> WorkerConfig {
        WorkerConfig::default().with_essential_resources(["/", "/project.css", "/manifest.json"])
    }

    fn site() -> StubFetcher {
        StubFetcher::new()
            .route("/", Response::ok("<html>home</html>"))
            .route("/project.css", Response::ok("body{}"))
            .route("/manifest.json", Response::ok("{}"))
    }

    #[tokio::test]
    async fn test_install_caches_every_essential_resource() {
        let storage = MemoryCacheStorage::new();
        let host = Arc::new(RecordingHost::default());
        let mgr = manager(small_config(), &storage, site(), host.clone());

        let report = mgr.install().await.unwrap();
        assert_eq!(report.generation.as_str(), "archaeologyworld-v2");
        assert_eq!(report.cached, vec!["/", "/project.css", "/manifest.json"]);

        let cache = storage.open("archaeologyworld-v2").await.unwrap();
        for path in ["/", "/project.css", "/manifest.json"] {
            assert!(cache.match_key(&CacheKey::get(path)).await.unwrap().is_some());
        }
        assert_eq!(host.skip_waiting_calls(), 1);
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let storage = MemoryCacheStorage::new();
        let host = Arc::new(RecordingHost::default());
        let fetcher = site().route("/manifest.json", Response::empty(StatusCode::NOT_FOUND));
        let mgr = manager(small_config(), &storage, fetcher, host);

        let err = mgr.install().await.unwrap_err();
        match err {
            Error::Population { path, source } => {
                assert_eq!(path, "/manifest.json");
                assert!(matches!(source, FetchError::Status(404)));
            }
            other => panic!("unexpected error: {other}"),
        }
        let generation = storage.generation("archaeologyworld-v2").await.unwrap();
        assert!(generation.is_empty().await);
    }

    #[tokio::test]
    async fn test_install_fails_on_network_error() {
        let storage = MemoryCacheStorage::new();
        let fetcher = StubFetcher::new()
            .route("/", Response::ok("home"))
            .route("/project.css", Response::ok("css"));
        let mgr = manager(small_config(), &storage, fetcher, Arc::default());

        let err = mgr.install().await.unwrap_err();
        assert!(err.is_population_failure());
        assert!(err.to_string().contains("/manifest.json"));
    }

    #[tokio::test]
    async fn test_activate_keeps_only_current_generation_in_namespace() {
        let storage = MemoryCacheStorage::new();
        storage.open("archaeologyworld-v1").await.unwrap();
        storage.open("archaeologyworld-v2").await.unwrap();
        storage.open("unrelated-v1").await.unwrap();
        let host = Arc::new(RecordingHost::default());
        let mgr = manager(
            small_config().with_version("v3"),
            &storage,
            site(),
            host.clone(),
        );

        mgr.install().await.unwrap();
        let report = mgr.activate().await.unwrap();

        assert!(report.all_deleted());
        assert_eq!(report.deleted.len(), 2);
        assert_eq!(report.retained.unwrap().as_str(), "archaeologyworld-v3");
        assert_eq!(
            storage.keys().await.unwrap(),
            vec!["archaeologyworld-v3", "unrelated-v1"]
        );
        assert_eq!(host.claim_calls(), 1);
    }
}
