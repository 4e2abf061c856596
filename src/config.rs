//! Worker configuration.
//!
//! Defaults reproduce the deployed constants. Files may override any subset
//! of fields, and `OFFLINE_WORKER_VERSION` / `OFFLINE_WORKER_NAMESPACE`
//! override the cache identity at startup.

use crate::cache::GenerationId;
use crate::{Error, ErrorContext, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_NAMESPACE: &str = "archaeologyworld";
pub const DEFAULT_VERSION: &str = "v2";

const DEFAULT_ESSENTIAL_RESOURCES: &[&str] = &[
    "/",
    "/project.css",
    "/server.js",
    "/manifest.json",
    "/service-worker.js",
    "/fotos/b920f10b-c8ff-4e69-aeaf-515171ddf4ec.jpg",
];

const DEFAULT_FALLBACK_KEYS: &[&str] = &["/index.html", "/"];

const DEFAULT_OFFLINE_BODY: &str = "<!doctype html>\
<html><head><meta charset=\"utf-8\"><title>Offline</title></head>\
<body><h1>Offline</h1><p>This page is not available without a connection.</p></body></html>";

/// Synthesized response for navigations when network and cache both fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflinePage {
    pub status: u16,
    pub body: String,
}

impl Default for OfflinePage {
    fn default() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            body: DEFAULT_OFFLINE_BODY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub namespace: String,
    pub version: String,
    /// Resources that must all be cached before install succeeds.
    pub essential_resources: Vec<String>,
    /// Cache keys tried in order when a navigation cannot reach the network.
    pub fallback_keys: Vec<String>,
    pub offline_page: OfflinePage,
    /// Status of the empty response returned when a static asset is unreachable.
    pub asset_failure_status: u16,
    /// Upper bound on each network fetch. `None` leaves fetches unbounded.
    #[serde(rename = "fetch_timeout_ms", with = "opt_millis")]
    pub fetch_timeout: Option<Duration>,
    /// Site origin. When set, requests for other origins are not intercepted.
    pub origin: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            version: DEFAULT_VERSION.to_string(),
            essential_resources: DEFAULT_ESSENTIAL_RESOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fallback_keys: DEFAULT_FALLBACK_KEYS.iter().map(|s| s.to_string()).collect(),
            offline_page: OfflinePage::default(),
            asset_failure_status: StatusCode::GATEWAY_TIMEOUT.as_u16(),
            fetch_timeout: None,
            origin: None,
        }
    }
}

impl WorkerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_essential_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.essential_resources = resources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fallback_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_offline_page(mut self, status: u16, body: impl Into<String>) -> Self {
        self.offline_page = OfflinePage {
            status,
            body: body.into(),
        };
        self
    }

    pub fn with_asset_failure_status(mut self, status: u16) -> Self {
        self.asset_failure_status = status;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Apply `OFFLINE_WORKER_VERSION` and `OFFLINE_WORKER_NAMESPACE` if set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(version) = std::env::var("OFFLINE_WORKER_VERSION") {
            self.version = version;
        }
        if let Ok(namespace) = std::env::var("OFFLINE_WORKER_NAMESPACE") {
            self.namespace = namespace;
        }
        self
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            other => Err(Error::configuration_with_context(
                "unsupported config file extension",
                ErrorContext::new()
                    .with_details(format!("{:?}", other))
                    .with_source("config_loader"),
            )),
        }
    }

    pub fn generation_id(&self) -> GenerationId {
        GenerationId::new(&self.namespace, &self.version)
    }

    pub fn offline_status(&self) -> StatusCode {
        StatusCode::from_u16(self.offline_page.status).unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
    }

    pub fn asset_failure_status(&self) -> StatusCode {
        StatusCode::from_u16(self.asset_failure_status).unwrap_or(StatusCode::GATEWAY_TIMEOUT)
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(invalid("namespace must not be empty", "namespace"));
        }
        if self.version.trim().is_empty() {
            return Err(invalid("version must not be empty", "version"));
        }
        for (i, path) in self.essential_resources.iter().enumerate() {
            if !path.starts_with('/') {
                return Err(invalid(
                    "essential resource must be an absolute path",
                    format!("essential_resources[{}]", i),
                ));
            }
        }
        for (i, key) in self.fallback_keys.iter().enumerate() {
            if !key.starts_with('/') {
                return Err(invalid(
                    "fallback key must be an absolute path",
                    format!("fallback_keys[{}]", i),
                ));
            }
        }
        if StatusCode::from_u16(self.offline_page.status).is_err() {
            return Err(invalid("invalid status code", "offline_page.status"));
        }
        if StatusCode::from_u16(self.asset_failure_status).is_err() {
            return Err(invalid("invalid status code", "asset_failure_status"));
        }
        if let Some(ref origin) = self.origin {
            if url::Url::parse(origin).is_err() {
                return Err(invalid("origin must be an absolute URL", "origin"));
            }
        }
        Ok(())
    }
}

fn invalid(msg: &str, field: impl Into<String>) -> Error {
    Error::configuration_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("worker_config"),
    )
}

mod opt_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(v: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
