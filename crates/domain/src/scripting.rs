//! Lifecycle hook scripting.
//!
//! A project carries two optional hook scripts: one run after the project is
//! loaded and one run before it is saved. This module defines the
//! language-independent parts: which hook, what a script may see, and what
//! it produced.

use serde::{Deserialize, Serialize};

/// The two lifecycle hooks of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleHook {
    /// Runs once the entity graph has been built.
    AfterLoad,
    /// Runs before the document is serialized.
    BeforeSave,
}

impl LifecycleHook {
    /// Returns the hook's name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AfterLoad => "afterLoad",
            Self::BeforeSave => "beforeSave",
        }
    }
}

impl std::fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if a hook body has nothing to run.
#[must_use]
pub fn is_blank(body: Option<&str>) -> bool {
    body.is_none_or(|b| b.trim().is_empty())
}

/// A hook command of the default line-oriented engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookCommand {
    /// Set a context variable: `set("name", "value")`
    SetVariable {
        /// Variable name.
        name: String,
        /// Variable value.
        value: String,
    },
    /// Set a custom project property: `setProperty("name", "value")`
    SetProperty {
        /// Property name.
        name: String,
        /// Property value.
        value: String,
    },
    /// Write to the injected log sink: `log("message")`
    Log {
        /// The message to log.
        message: String,
    },
    /// Fail the hook unless a condition holds: `assert(condition, message)`
    Assert {
        /// The condition expression.
        condition: String,
        /// Optional message if the assertion fails.
        message: Option<String>,
    },
}

/// Read-only view of the project bound as `project` while a hook runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectView {
    /// Project name.
    pub name: String,
    /// Origin path or URL.
    pub path: Option<String>,
    /// Resource root template.
    pub resource_root: String,
    /// Number of interfaces.
    pub interface_count: usize,
    /// Number of test suites.
    pub test_suite_count: usize,
    /// Number of mock services.
    pub mock_service_count: usize,
}

/// What a successful hook run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutcome {
    /// Project properties to set, in execution order.
    pub property_updates: Vec<(String, String)>,
    /// Number of lines written to the log sink.
    pub log_lines: usize,
}

impl ScriptOutcome {
    /// Creates an empty outcome.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a property update.
    pub fn add_property_update(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.property_updates.push((name.into(), value.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("  \n\t")));
        assert!(!is_blank(Some("log(\"hi\")")));
    }

    #[test]
    fn test_hook_names() {
        assert_eq!(LifecycleHook::AfterLoad.to_string(), "afterLoad");
        assert_eq!(LifecycleHook::BeforeSave.as_str(), "beforeSave");
    }

    #[test]
    fn test_outcome_records_updates_in_order() {
        let mut outcome = ScriptOutcome::new();
        outcome.add_property_update("b", "1");
        outcome.add_property_update("a", "2");
        assert_eq!(
            outcome.property_updates,
            vec![
                ("b".to_string(), "1".to_string()),
                ("a".to_string(), "2".to_string())
            ]
        );
    }
}
