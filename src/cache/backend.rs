//! Cache storage backends.

use super::key::CacheKey;
use crate::types::Response;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{operation} failed for '{target}': {message}")]
    Backend {
        operation: &'static str,
        target: String,
        message: String,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn backend(
        operation: &'static str,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StorageError::Backend {
            operation,
            target: target.into(),
            message: message.into(),
        }
    }
}

/// One opened cache generation.
#[async_trait]
pub trait Cache: Send + Sync {
    fn name(&self) -> &str;
    /// Store a snapshot, replacing any previous one under the same key.
    async fn put(&self, key: &CacheKey, response: Response) -> Result<(), StorageError>;
    async fn match_key(&self, key: &CacheKey) -> Result<Option<Response>, StorageError>;
    async fn keys(&self) -> Result<Vec<CacheKey>, StorageError>;
}

/// The host's keyed storage capability.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a generation, creating it when absent.
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, StorageError>;
    async fn has(&self, name: &str) -> Result<bool, StorageError>;
    /// Delete a whole generation. Returns false if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;
    /// Names of every existing generation.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
    fn backend_name(&self) -> &'static str;
}

pub struct MemoryCache {
    name: String,
    entries: RwLock<HashMap<CacheKey, Response>>,
}

impl MemoryCache {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    fn name(&self) -> &str {
        &self.name
    }
    async fn put(&self, key: &CacheKey, response: Response) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.clone(), response);
        Ok(())
    }
    async fn match_key(&self, key: &CacheKey) -> Result<Option<Response>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }
    async fn keys(&self) -> Result<Vec<CacheKey>, StorageError> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

/// In-memory storage. Generation names enumerate in sorted order.
///
/// Handles returned by `open` stay usable after their generation is deleted,
/// but they are detached: a later `open` of the same name starts empty.
#[derive(Clone, Default)]
pub struct MemoryCacheStorage {
    generations: Arc<RwLock<BTreeMap<String, Arc<MemoryCache>>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed handle to an existing generation, without creating it.
    pub async fn generation(&self, name: &str) -> Option<Arc<MemoryCache>> {
        self.generations.read().await.get(name).cloned()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, StorageError> {
        if let Some(existing) = self.generations.read().await.get(name) {
            let cache: Arc<dyn Cache> = existing.clone();
            return Ok(cache);
        }
        let mut generations = self.generations.write().await;
        let cache: Arc<dyn Cache> = generations
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCache::new(name)))
            .clone();
        Ok(cache)
    }
    async fn has(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.generations.read().await.contains_key(name))
    }
    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.generations.write().await.remove(name).is_some())
    }
    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.generations.read().await.keys().cloned().collect())
    }
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
