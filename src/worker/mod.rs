//! 工作者模块：将生命周期管理、请求路由与检索策略组合为单一入口。
//!
//! # Offline Worker Module
//!
//! [`OfflineWorker`] is what a host drives. It maps the three host events to
//! [`OfflineWorker::install`], [`OfflineWorker::activate`] and
//! [`OfflineWorker::handle_fetch`], and enforces their order: activation
//! needs a successful install, and requests are only intercepted once the
//! worker is active.
//!
//! ```rust
//! use offline_worker::{OfflineWorkerBuilder, WorkerConfig};
//!
//! let worker = OfflineWorkerBuilder::new()
//!     .config(WorkerConfig::default().with_version("v3"))
//!     .origin_fetcher("https://archaeology.world")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! assert_eq!(worker.generation_id().as_str(), "archaeologyworld-v3");
//! ```

mod builder;
mod core;

pub use self::builder::OfflineWorkerBuilder;
pub use self::core::OfflineWorker;
