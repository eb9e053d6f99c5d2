//! Lifecycle hook host.
//!
//! Owns at most one script engine per hook slot. Engines are created on the
//! first run of a non-empty hook and reused afterwards. Hook failures are
//! logged and swallowed: they never fail the load or save that triggered
//! them.

use std::sync::Arc;

use apiforge_domain::scripting::is_blank;
use apiforge_domain::{LifecycleHook, ProjectView, ScriptOutcome};

use crate::error::ScriptError;
use crate::ports::{ScriptBindings, ScriptContext, ScriptEngine, ScriptEngineFactory, ScriptLog};

/// Runs the after-load and before-save hooks of one project.
pub struct LifecycleScriptHost {
    factory: Arc<dyn ScriptEngineFactory>,
    log: Arc<dyn ScriptLog>,
    after_load: Option<Box<dyn ScriptEngine>>,
    before_save: Option<Box<dyn ScriptEngine>>,
}

impl LifecycleScriptHost {
    /// Creates a host without engines.
    #[must_use]
    pub fn new(factory: Arc<dyn ScriptEngineFactory>, log: Arc<dyn ScriptLog>) -> Self {
        Self {
            factory,
            log,
            after_load: None,
            before_save: None,
        }
    }

    fn slot(&mut self, hook: LifecycleHook) -> &mut Option<Box<dyn ScriptEngine>> {
        match hook {
            LifecycleHook::AfterLoad => &mut self.after_load,
            LifecycleHook::BeforeSave => &mut self.before_save,
        }
    }

    /// Returns true once an engine exists for `hook`.
    #[must_use]
    pub const fn has_engine(&self, hook: LifecycleHook) -> bool {
        match hook {
            LifecycleHook::AfterLoad => self.after_load.is_some(),
            LifecycleHook::BeforeSave => self.before_save.is_some(),
        }
    }

    /// Pushes a changed hook body to an existing engine.
    pub fn update_source(&mut self, hook: LifecycleHook, body: Option<&str>) {
        if let Some(engine) = self.slot(hook) {
            engine.set_source(body.unwrap_or_default());
        }
    }

    /// Runs `body` for `hook`.
    ///
    /// Returns `None` if the body is empty or the script failed; failures
    /// are logged.
    pub fn run(
        &mut self,
        hook: LifecycleHook,
        body: Option<&str>,
        context: &mut ScriptContext,
        project: &ProjectView,
    ) -> Option<ScriptOutcome> {
        let body = body.filter(|b| !is_blank(Some(*b)))?;

        match self.try_run(hook, body, context, project) {
            Ok(outcome) => {
                tracing::debug!(
                    hook = %hook,
                    project = %project.name,
                    updates = outcome.property_updates.len(),
                    "Hook script completed"
                );
                Some(outcome)
            }
            Err(err) => {
                tracing::error!(
                    hook = %hook,
                    project = %project.name,
                    error = %err,
                    "Hook script failed"
                );
                None
            }
        }
    }

    fn try_run(
        &mut self,
        hook: LifecycleHook,
        body: &str,
        context: &mut ScriptContext,
        project: &ProjectView,
    ) -> Result<ScriptOutcome, ScriptError> {
        let log = Arc::clone(&self.log);
        let factory = Arc::clone(&self.factory);
        let engine = self
            .slot(hook)
            .get_or_insert_with(|| factory.create(hook, body));

        if engine.source() != body {
            engine.set_source(body);
        }

        let mut bindings = ScriptBindings {
            context,
            project,
            log: log.as_ref(),
        };
        engine.run(&mut bindings)
    }

    /// Releases both engines.
    pub fn release(&mut self) {
        for mut engine in [self.after_load.take(), self.before_save.take()]
            .into_iter()
            .flatten()
        {
            engine.release();
        }
    }
}

impl std::fmt::Debug for LifecycleScriptHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleScriptHost")
            .field("after_load", &self.after_load.is_some())
            .field("before_save", &self.before_save.is_some())
            .finish_non_exhaustive()
    }
}
