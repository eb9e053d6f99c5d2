//! Test suite nodes (`testSuite[]`).

use serde::{Deserialize, Serialize};

use super::common::{Id, OpaqueFields};

/// A test suite node.
///
/// Test cases and steps are owned by the test runner and kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuiteConfig {
    /// Stable identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,

    /// Test suite name, unique within the project.
    pub name: String,

    /// Fields owned by the test runner.
    #[serde(flatten)]
    pub extra: OpaqueFields,
}

impl TestSuiteConfig {
    /// Creates an empty test suite node.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            extra: OpaqueFields::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_test_cases_are_preserved() {
        let json = r#"{"name": "Smoke", "testCase": [{"name": "login"}]}"#;
        let suite: TestSuiteConfig = serde_json::from_str(json).unwrap();
        assert_eq!(suite.name, "Smoke");
        assert!(suite.id.is_none());
        assert_eq!(suite.extra["testCase"][0]["name"], "login");
    }
}
