//! 缓存模块：按版本划分的缓存代（generation）及可插拔存储后端。
//!
//! # Cache Generation Module
//!
//! This module models the host's keyed storage capability: a set of named
//! cache generations, each mapping a request identity to a stored response
//! snapshot.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheStorage`] | Trait for the storage capability (`open`, `keys`, `delete`) |
//! | [`Cache`] | Trait for one opened generation (`put`, `match_key`) |
//! | [`MemoryCacheStorage`] | In-memory storage, the default and the test fake |
//! | [`GenerationId`] | `<namespace>-<version>` name of a generation |
//! | [`CacheKey`] | Request identity (method + normalized URL) |
//!
//! ## Example
//!
//! ```rust
//! use offline_worker::cache::{CacheKey, CacheStorage, GenerationId, MemoryCacheStorage};
//! use offline_worker::types::Response;
//!
//! # tokio_test::block_on(async {
//! let storage = MemoryCacheStorage::new();
//! let id = GenerationId::new("archaeologyworld", "v2");
//!
//! let cache = storage.open(id.as_str()).await.unwrap();
//! cache.put(&CacheKey::get("/"), Response::ok("<html></html>")).await.unwrap();
//!
//! assert!(cache.match_key(&CacheKey::get("/")).await.unwrap().is_some());
//! assert_eq!(storage.keys().await.unwrap(), vec!["archaeologyworld-v2".to_string()]);
//! # });
//! ```
//!
//! Writes are single-key and last-write-wins. There is no entry-level eviction:
//! a generation is only ever removed whole.

mod backend;
mod generation;
mod key;

pub use backend::{Cache, CacheStorage, MemoryCache, MemoryCacheStorage, StorageError};
pub use generation::GenerationId;
pub use key::CacheKey;
