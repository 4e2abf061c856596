//! Fakes shared by the unit tests.

use crate::cache::CacheKey;
use crate::lifecycle::ClientHost;
use crate::transport::{FetchError, Fetcher};
use crate::types::{Request, Response};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Network fake serving fixed routes and counting calls.
#[derive(Default)]
pub struct StubFetcher {
    routes: HashMap<String, Response>,
    offline: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, response: Response) -> Self {
        self.routes.insert(CacheKey::get(path).url, response);
        self
    }

    pub fn offline(self) -> Self {
        self.set_offline(true);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
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
impl Fetcher for StubFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let path = CacheKey::for_request(request).url;
        self.calls.lock().unwrap().push(path.clone());
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Network("offline".into()));
        }
        self.routes
            .get(&path)
            .cloned()
            .ok_or_else(|| FetchError::Network(format!("connection refused for {}", path)))
    }
}

#[derive(Default)]
pub struct RecordingHost {
    skip_waiting: AtomicUsize,
    claims: AtomicUsize,
}

impl RecordingHost {
    pub fn skip_waiting_calls(&self) -> usize {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    pub fn claim_calls(&self) -> usize {
        self.claims.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientHost for RecordingHost {
    async fn skip_waiting(&self) {
        self.skip_waiting.fetch_add(1, Ordering::SeqCst);
    }
    async fn claim_clients(&self) {
        self.claims.fetch_add(1, Ordering::SeqCst);
    }
}
