use super::{RetrievalStrategy, StrategyContext};
use crate::cache::CacheKey;
use crate::types::{Request, Response};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Network-first strategy for document loads.
///
/// Offline, the configured fallback keys are tried in order, then the
/// offline notice is synthesized.
pub struct NavigationStrategy {
    ctx: Arc<StrategyContext>,
}

impl NavigationStrategy {
    pub fn new(ctx: Arc<StrategyContext>) -> Self {
        Self { ctx }
    }

    async fn fallback(&self, request: &Request) -> Response {
        for raw in &self.ctx.config().fallback_keys {
            if let Some(cached) = self.ctx.lookup_fallback(&CacheKey::get(raw)).await {
                debug!(url = %request.url, fallback = %raw, "serving cached fallback");
                self.ctx.count_fallback();
                return cached;
            }
        }
        warn!(url = %request.url, "no cached fallback; serving offline notice");
        self.ctx.count_synthesized();
        let page = &self.ctx.config().offline_page;
        Response::html(self.ctx.config().offline_status(), page.body.clone())
    }
}

#[async_trait]
impl RetrievalStrategy for NavigationStrategy {
    fn name(&self) -> &'static str {
        "network-first"
    }

    async fn respond(&self, request: &Request) -> Response {
        match self.ctx.fetch(request).await {
            Ok(response) => {
                self.ctx
                    .persist(self.ctx.key_for(request), response.clone());
                response
            }
            Err(_) => self.fallback(request).await,
        }
    }
}
