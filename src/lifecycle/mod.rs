//! 生命周期模块：缓存代的安装、激活与过期清理。
//!
//! # Generation Lifecycle Module
//!
//! The generation manager owns cache identity. On install it populates the
//! generation named by the current [`GenerationId`](crate::cache::GenerationId)
//! with every essential resource (all or nothing). On activation it deletes
//! every other generation in the namespace.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`GenerationManager`] | Install and activate operations |
//! | [`ClientHost`] | Host capabilities: skip-waiting and client claim |
//! | [`WorkerState`] | Lifecycle state of one worker instance |
//! | [`InstallReport`] / [`ActivationReport`] | Outcome of each operation |
//!
//! Stale-generation deletions are independent: one failing deletion is
//! logged and reported, and never aborts activation.

mod manager;
mod state;

pub use manager::{ActivationReport, GenerationManager, InstallReport};
pub use state::WorkerState;

use async_trait::async_trait;

/// Capabilities the host offers to a worker instance during its lifecycle.
#[async_trait]
pub trait ClientHost: Send + Sync {
    /// Activate this instance without waiting for older instances to finish.
    async fn skip_waiting(&self);
    /// Take control of every open client immediately.
    async fn claim_clients(&self);
}

/// Host that ignores lifecycle signals.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

#[async_trait]
impl ClientHost for NoopHost {
    async fn skip_waiting(&self) {}
    async fn claim_clients(&self) {}
}
