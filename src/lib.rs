//! # offline-worker
//!
//! 面向静态站点的离线缓存代理：维护按版本划分的缓存代，并为每个被拦截的请求选择检索策略。
//!
//! Offline caching agent for a static website. It keeps a versioned cache of
//! the site fresh across redeploys and answers intercepted requests from the
//! network or the cache depending on the request class.
//!
//! ## Overview
//!
//! - **Generations**: every deploy is a cache generation named
//!   `<namespace>-<version>`. Install fills it with the essential resources
//!   (all or nothing); activation deletes every older generation.
//! - **Navigations** are network-first. Offline, they fall back to the cached
//!   `/index.html`, then `/`, then a synthesized offline notice.
//! - **Static assets** are cache-first. A miss is fetched and stored; an
//!   unreachable asset yields an empty gateway-timeout response.
//! - **Non-GET** requests are never intercepted.
//!
//! The host's storage, network and client-control facilities are capability
//! traits ([`CacheStorage`], [`Fetcher`], [`ClientHost`]) so the policy runs
//! against any backend, including the in-memory fakes used in tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use offline_worker::{OfflineWorkerBuilder, Request, WorkerConfig};
//!
//! #[tokio::main]
//! async fn main() -> offline_worker::Result<()> {
//!     let worker = OfflineWorkerBuilder::new()
//!         .config(WorkerConfig::from_env())
//!         .origin_fetcher("https://archaeology.world")?
//!         .build()?;
//!
//!     worker.install().await?;
//!     worker.activate().await?;
//!
//!     let outcome = worker.handle_fetch(&Request::navigate("/")).await;
//!     println!("{:?}", outcome.response().map(|r| r.status));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Cache generations and storage backends |
//! | [`config`] | Worker configuration and loading |
//! | [`lifecycle`] | Install/activate and stale-generation cleanup |
//! | [`routing`] | Request classification and dispatch |
//! | [`strategy`] | Network-first and cache-first retrieval |
//! | [`transport`] | Network capability and its `reqwest` implementation |
//! | [`types`] | Request and response descriptors |
//! | [`worker`] | The assembled worker and its builder |

pub mod cache;
pub mod config;
pub mod lifecycle;
pub mod routing;
pub mod strategy;
pub mod transport;
pub mod types;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{CacheStorage, GenerationId, MemoryCacheStorage};
pub use config::WorkerConfig;
pub use lifecycle::{ClientHost, NoopHost, WorkerState};
pub use routing::FetchOutcome;
pub use transport::{FetchError, Fetcher};
pub use types::{Request, RequestMode, Response};
pub use worker::{OfflineWorker, OfflineWorkerBuilder};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
