//! Common types shared across persistence models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A UUID string type for stable identifiers.
/// Using String instead of `uuid::Uuid` keeps the on-disk format free-form.
pub type Id = String;

/// Unknown fields of a document node, preserved verbatim across load/save.
///
/// Nodes owned by external collaborators (test steps, mock responses,
/// security containers) are opaque to the engine; `BTreeMap` keeps their
/// key order deterministic on write.
pub type OpaqueFields = BTreeMap<String, serde_json::Value>;

/// Resource root assigned to newly created projects.
pub const DEFAULT_RESOURCE_ROOT: &str = "${projectDir}";

/// A custom project property (`properties` node).
///
/// Properties are an ordered list, not a map: document order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyConfig {
    /// Property name.
    pub name: String,
    /// Property value.
    #[serde(default)]
    pub value: String,
}

impl PropertyConfig {
    /// Creates a new property.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
