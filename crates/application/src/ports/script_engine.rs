//! Hook script engine port.
//!
//! Only the invocation contract lives here. The language itself is provided
//! by an adapter.

use std::collections::BTreeMap;

use apiforge_domain::{LifecycleHook, ProjectView, ScriptOutcome};

use crate::error::ScriptError;

/// Property-expansion context shared between hooks.
pub type ScriptContext = BTreeMap<String, String>;

/// Sink for lines a hook logs.
pub trait ScriptLog: Send + Sync {
    /// Records one line written by a hook.
    fn log(&self, hook: LifecycleHook, message: &str);
}

/// Variables bound for one hook run.
pub struct ScriptBindings<'a> {
    /// Mutable property-expansion context.
    pub context: &'a mut ScriptContext,
    /// Read-only view of the owning project.
    pub project: &'a ProjectView,
    /// Injected log sink.
    pub log: &'a dyn ScriptLog,
}

impl std::fmt::Debug for ScriptBindings<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptBindings")
            .field("context", &self.context)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

/// A compiled hook script, reusable across runs.
pub trait ScriptEngine: Send + Sync {
    /// Returns the source the engine currently runs.
    fn source(&self) -> &str;

    /// Replaces the source.
    fn set_source(&mut self, source: &str);

    /// Runs the script synchronously.
    ///
    /// # Errors
    ///
    /// Returns a [`ScriptError`] if the script cannot be parsed, an
    /// assertion fails, or the engine has been released.
    fn run(&mut self, bindings: &mut ScriptBindings<'_>) -> Result<ScriptOutcome, ScriptError>;

    /// Frees the engine. Later runs fail with [`ScriptError::Released`].
    fn release(&mut self);
}

/// Creates script engines for hook slots.
pub trait ScriptEngineFactory: Send + Sync {
    /// Creates an engine for `hook` running `source`.
    fn create(&self, hook: LifecycleHook, source: &str) -> Box<dyn ScriptEngine>;
}
