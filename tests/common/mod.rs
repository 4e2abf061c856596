//! Test doubles for the host capabilities.

#![allow(dead_code)]

use async_trait::async_trait;
use offline_worker::cache::{Cache, CacheKey, StorageError};
use offline_worker::{
    CacheStorage, ClientHost, FetchError, Fetcher, MemoryCacheStorage, OfflineWorker,
    OfflineWorkerBuilder, Request, Response, WorkerConfig,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Static site served from memory. Can be switched offline at any time.
#[derive(Default)]
pub struct FakeSite {
    pages: Mutex<HashMap<String, Response>>,
    offline: AtomicBool,
    hang: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The default essential resources plus `/index.html`, bodies tagged with `tag`.
    pub fn deployed(tag: &str) -> Arc<Self> {
        let site = Self::new();
        for path in WorkerConfig::default().essential_resources {
            site.serve(&path, &format!("{} {}", tag, path));
        }
        site.serve("/index.html", &format!("{} index", tag));
        site
    }

    pub fn serve(&self, path: &str, body: &str) {
        self.serve_response(path, Response::ok(body.to_string()));
    }

    pub fn serve_response(&self, path: &str, response: Response) {
        self.pages
            .lock()
            .unwrap()
            .insert(CacheKey::get(path).url, response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make every fetch hang forever.
    pub fn set_hanging(&self, hang: bool) {
        self.hang.store(hang, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

#[async_trait]
impl Fetcher for FakeSite {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let path = CacheKey::for_request(request).url;
        self.calls.lock().unwrap().push(path.clone());
        if self.hang.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Network("net::ERR_INTERNET_DISCONNECTED".into()));
        }
        let page = self.pages.lock().unwrap().get(&path).cloned();
        Ok(page.unwrap_or_else(|| Response::empty(reqwest::StatusCode::NOT_FOUND)))
    }
}

#[derive(Default)]
pub struct CountingHost {
    skip_waiting: AtomicUsize,
    claims: AtomicUsize,
}

impl CountingHost {
    pub fn claim_calls(&self) -> usize {
        self.claims.load(Ordering::SeqCst)
    }

    pub fn skip_waiting_calls(&self) -> usize {
        self.skip_waiting.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientHost for CountingHost {
    async fn skip_waiting(&self) {
        self.skip_waiting.fetch_add(1, Ordering::SeqCst);
    }
    async fn claim_clients(&self) {
        self.claims.fetch_add(1, Ordering::SeqCst);
    }
}

/// Memory storage whose deletes or writes fail for selected generation names.
#[derive(Clone, Default)]
pub struct StubbornStorage {
    pub inner: MemoryCacheStorage,
    refuse: Arc<Mutex<HashSet<String>>>,
    refuse_put: Arc<Mutex<HashSet<String>>>,
}

impl StubbornStorage {
    pub fn refuse_delete(&self, name: &str) {
        self.refuse.lock().unwrap().insert(name.to_string());
    }

    /// Every later `put` into `name` fails, including through handles opened earlier.
    pub fn refuse_put(&self, name: &str) {
        self.refuse_put.lock().unwrap().insert(name.to_string());
    }
}

struct StubbornCache {
    inner: Arc<dyn Cache>,
    refuse_put: Arc<Mutex<HashSet<String>>>,
}

#[async_trait]
impl Cache for StubbornCache {
    fn name(&self) -> &str {
        self.inner.name()
    }
    async fn put(&self, key: &CacheKey, response: Response) -> Result<(), StorageError> {
        let refused = self.refuse_put.lock().unwrap().contains(self.inner.name());
        if refused {
            return Err(StorageError::backend("put", self.inner.name(), "quota exceeded"));
        }
        self.inner.put(key, response).await
    }
    async fn match_key(&self, key: &CacheKey) -> Result<Option<Response>, StorageError> {
        self.inner.match_key(key).await
    }
    async fn keys(&self) -> Result<Vec<CacheKey>, StorageError> {
        self.inner.keys().await
    }
}

#[async_trait]
impl CacheStorage for StubbornStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, StorageError> {
        let cache: Arc<dyn Cache> = Arc::new(StubbornCache {
            inner: self.inner.open(name).await?,
            refuse_put: self.refuse_put.clone(),
        });
        Ok(cache)
    }
    async fn has(&self, name: &str) -> Result<bool, StorageError> {
        self.inner.has(name).await
    }
    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        if self.refuse.lock().unwrap().contains(name) {
            return Err(StorageError::backend("delete", name, "database locked"));
        }
        self.inner.delete(name).await
    }
    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys().await
    }
    fn backend_name(&self) -> &'static str {
        "stubborn"
    }
}

pub fn worker(
    config: WorkerConfig,
    storage: Arc<dyn CacheStorage>,
    site: Arc<FakeSite>,
) -> OfflineWorker {
    OfflineWorkerBuilder::new()
        .config(config)
        .storage(storage)
        .fetcher(site)
        .build()
        .expect("valid worker")
}

/// Installed and activated worker over the default config.
pub async fn active_worker(storage: &MemoryCacheStorage, site: Arc<FakeSite>) -> OfflineWorker {
    let w = worker(WorkerConfig::default(), Arc::new(storage.clone()), site);
    w.install().await.expect("install");
    w.activate().await.expect("activate");
    w
}
