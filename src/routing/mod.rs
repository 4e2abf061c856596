//! 请求路由模块：按请求方法与模式分派到对应的检索策略。
//!
//! # Request Routing Module
//!
//! Every intercepted request is classified on two axes only: its method and
//! its mode. Non-GET requests are never intercepted; navigations go to the
//! network-first strategy; everything else goes to the cache-first one.

use crate::strategy::{
    NavigationStrategy, RetrievalStrategy, StaticAssetStrategy, StrategyContext,
};
use crate::types::{Request, Response};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// What the host should do with an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not intercepted: the host sends the request to the network unmodified.
    PassThrough,
    Respond(Response),
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::Respond(r) => Some(r),
            FetchOutcome::PassThrough => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            FetchOutcome::Respond(r) => Some(r),
            FetchOutcome::PassThrough => None,
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, FetchOutcome::PassThrough)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Non-GET or cross-origin
    NonCacheable,
    Navigation,
    StaticAsset,
}

pub struct RequestRouter {
    ctx: Arc<StrategyContext>,
    navigation: NavigationStrategy,
    assets: StaticAssetStrategy,
}

impl RequestRouter {
    pub fn new(ctx: Arc<StrategyContext>) -> Self {
        Self {
            navigation: NavigationStrategy::new(ctx.clone()),
            assets: StaticAssetStrategy::new(ctx.clone()),
            ctx,
        }
    }

    pub fn context(&self) -> &Arc<StrategyContext> {
        &self.ctx
    }

    pub fn classify(&self, request: &Request) -> RequestClass {
        if !request.is_get() || self.is_cross_origin(&request.url) {
            RequestClass::NonCacheable
        } else if request.is_navigation() {
            RequestClass::Navigation
        } else {
            RequestClass::StaticAsset
        }
    }

    fn is_cross_origin(&self, raw: &str) -> bool {
        let Some(origin) = self.ctx.site_origin() else {
            return false;
        };
        match Url::parse(raw) {
            Ok(url) => url.origin() != *origin,
            // site-relative path
            Err(_) => false,
        }
    }

    pub async fn route(&self, request: &Request) -> FetchOutcome {
        let strategy: &dyn RetrievalStrategy = match self.classify(request) {
            RequestClass::NonCacheable => {
                debug!(method = %request.method, url = %request.url, "passing through");
                return FetchOutcome::PassThrough;
            }
            RequestClass::Navigation => &self.navigation,
            RequestClass::StaticAsset => &self.assets,
        };
        debug!(url = %request.url, strategy = strategy.name(), "routing request");
        FetchOutcome::Respond(strategy.respond(request).await)
    }
}
