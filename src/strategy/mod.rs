//! 检索策略模块：导航请求的网络优先策略与静态资源的缓存优先策略。
//!
//! # Retrieval Strategies Module
//!
//! Each strategy turns an intercepted GET into a response and never fails:
//! every network or storage error is absorbed by a fallback.
//!
//! | Strategy | Order | Total failure |
//! |----------|-------|---------------|
//! | [`NavigationStrategy`] | network → fallback keys (`/index.html`, `/`) | offline notice (503, HTML) |
//! | [`StaticAssetStrategy`] | active generation → network | empty 504 |
//!
//! Successful network responses are written back to the active generation by
//! a tracked background task; the caller never waits for the write.

mod context;
mod navigation;
mod static_asset;
mod stats;

pub use context::StrategyContext;
pub use navigation::NavigationStrategy;
pub use static_asset::StaticAssetStrategy;
pub use stats::StrategyStats;

use crate::types::{Request, Response};
use async_trait::async_trait;

#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    /// Produce a response for a GET request. Infallible by contract.
    async fn respond(&self, request: &Request) -> Response;
}
