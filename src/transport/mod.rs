//! 网络传输模块：网络获取能力的抽象及基于 reqwest 的实现。
//!
//! # Network Transport Module
//!
//! The [`Fetcher`] trait is the network capability the strategies and the
//! generation manager depend on. [`HttpFetcher`] implements it over `reqwest`
//! for hosts with an origin reachable by HTTP; tests substitute their own.

pub mod http;

use crate::types::{Request, Response};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use http::HttpFetcher;

/// Network-error conditions.
///
/// A response with an error status is not a `FetchError` for the strategies;
/// only install treats non-success statuses as failures ([`FetchError::Status`]).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unexpected status {0}")]
    Status(u16),
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// Run a fetch with an optional upper bound.
///
/// `None` adds no timeout layer: a hung fetch stays hung.
pub async fn fetch_with_timeout(
    fetcher: &dyn Fetcher,
    request: &Request,
    timeout: Option<Duration>,
) -> Result<Response, FetchError> {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, fetcher.fetch(request)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(limit)),
        },
        None => fetcher.fetch(request).await,
    }
}
