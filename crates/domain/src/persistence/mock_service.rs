//! Mock service nodes (`mockService[]`).

use serde::{Deserialize, Serialize};

use super::common::{Id, OpaqueFields};

/// A mock service node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockServiceConfig {
    /// Stable identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,

    /// Mock service name, unique within the project.
    pub name: String,

    /// Port, path and mock operations; owned by the mock runner.
    #[serde(flatten)]
    pub extra: OpaqueFields,
}

impl MockServiceConfig {
    /// Creates an empty mock service node.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            extra: OpaqueFields::new(),
        }
    }
}
