use super::{RetrievalStrategy, StrategyContext};
use crate::types::{Request, Response};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Cache-first strategy for subresources.
///
/// A hit is returned without revalidation. A miss goes to the network and the
/// result warms the generation.
pub struct StaticAssetStrategy {
    ctx: Arc<StrategyContext>,
}

impl StaticAssetStrategy {
    pub fn new(ctx: Arc<StrategyContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl RetrievalStrategy for StaticAssetStrategy {
    fn name(&self) -> &'static str {
        "cache-first"
    }

    async fn respond(&self, request: &Request) -> Response {
        let key = self.ctx.key_for(request);
        if let Some(cached) = self.ctx.lookup(&key).await {
            debug!(key = %key, "cache hit");
            return cached;
        }

        match self.ctx.fetch(request).await {
            Ok(response) => {
                self.ctx.persist(key, response.clone());
                response
            }
            Err(_) => {
                self.ctx.count_synthesized();
                Response::empty(self.ctx.config().asset_failure_status())
            }
        }
    }
}
