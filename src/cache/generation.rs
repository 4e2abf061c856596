//! Generation identity.

use serde::{Deserialize, Serialize};

/// Name of one cache generation: `<namespace>-<version>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationId(String);

impl GenerationId {
    pub fn new(namespace: &str, version: &str) -> Self {
        Self(format!("{}-{}", namespace, version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a stored generation name was created under `namespace`.
    ///
    /// Names from other namespaces share the storage but are never touched.
    pub fn belongs_to(name: &str, namespace: &str) -> bool {
        name.strip_prefix(namespace)
            .map(|rest| rest.starts_with('-'))
            .unwrap_or(false)
    }
}

impl std::fmt::Display for GenerationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for GenerationId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
