//! Cache key derivation.

use crate::types::Request;
use reqwest::Method;
use url::{Origin, Url};

/// Identity of a request inside a cache generation.
///
/// Site-relative paths are kept as given. Absolute URLs keep scheme and host,
/// unless they are on the site origin passed to [`CacheKey::scoped`]: those
/// are reduced to path and query so that `https://site/a.css` and `/a.css`
/// address the same entry. Fragments never take part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub method: Method,
    pub url: String,
}

impl CacheKey {
    pub fn new(method: Method, url: &str) -> Self {
        Self::scoped(method, url, None)
    }

    /// Key with absolute URLs on `site` folded to their path.
    pub fn scoped(method: Method, url: &str, site: Option<&Origin>) -> Self {
        Self {
            method,
            url: normalize(url, site),
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn for_request(req: &Request) -> Self {
        Self::new(req.method.clone(), &req.url)
    }

    pub fn for_request_on(req: &Request, site: Option<&Origin>) -> Self {
        Self::scoped(req.method.clone(), &req.url, site)
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::get(s)
    }
}

fn normalize(raw: &str, site: Option<&Origin>) -> String {
    let without_fragment = raw.split('#').next().unwrap_or(raw);
    if without_fragment.starts_with('/') {
        return without_fragment.to_string();
    }
    match Url::parse(without_fragment) {
        Ok(url) if site.is_some_and(|o| url.origin() == *o) => match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        },
        Ok(url) => url.to_string(),
        Err(_) => without_fragment.to_string(),
    }
}
