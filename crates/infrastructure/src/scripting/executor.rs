//! Hook script engine running parsed commands.

use std::sync::LazyLock;

use apiforge_application::ScriptError;
use apiforge_application::ports::{ScriptBindings, ScriptEngine, ScriptEngineFactory};
use apiforge_domain::{HookCommand, LifecycleHook, ProjectView, ScriptOutcome};
use regex::Regex;

use super::parser::parse_script;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\$?[\w.]+)\s*\}\}").expect("valid regex"));

/// Engine for one hook slot. Commands are parsed once per source.
#[derive(Debug)]
pub struct HookScriptEngine {
    hook: LifecycleHook,
    source: String,
    compiled: Option<Vec<HookCommand>>,
    released: bool,
}

impl HookScriptEngine {
    /// Creates an engine for `hook` running `source`.
    #[must_use]
    pub fn new(hook: LifecycleHook, source: &str) -> Self {
        Self {
            hook,
            source: source.to_string(),
            compiled: None,
            released: false,
        }
    }

    /// Returns the hook slot this engine serves.
    #[must_use]
    pub const fn hook(&self) -> LifecycleHook {
        self.hook
    }

    fn commands(&mut self) -> Result<&[HookCommand], ScriptError> {
        if self.compiled.is_none() {
            self.compiled = Some(parse_script(&self.source)?);
        }
        Ok(self.compiled.as_deref().unwrap_or_default())
    }

    fn execute_command(
        hook: LifecycleHook,
        command: &HookCommand,
        bindings: &mut ScriptBindings<'_>,
        outcome: &mut ScriptOutcome,
    ) -> Result<(), ScriptError> {
        match command {
            HookCommand::SetVariable { name, value } => {
                let resolved = resolve_value(value, bindings);
                bindings.context.insert(name.clone(), resolved);
            }
            HookCommand::SetProperty { name, value } => {
                let resolved = resolve_value(value, bindings);
                outcome.add_property_update(name.clone(), resolved);
            }
            HookCommand::Log { message } => {
                let resolved = resolve_value(message, bindings);
                bindings.log.log(hook, &resolved);
                outcome.log_lines += 1;
            }
            HookCommand::Assert { condition, message } => {
                if !evaluate_condition(condition, bindings) {
                    let message = message.as_deref().map_or_else(
                        || condition.clone(),
                        |m| resolve_value(m, bindings),
                    );
                    return Err(ScriptError::Assertion(message));
                }
            }
        }
        Ok(())
    }
}

impl ScriptEngine for HookScriptEngine {
    fn source(&self) -> &str {
        &self.source
    }

    fn set_source(&mut self, source: &str) {
        if self.source != source {
            self.source = source.to_string();
            self.compiled = None;
        }
    }

    fn run(&mut self, bindings: &mut ScriptBindings<'_>) -> Result<ScriptOutcome, ScriptError> {
        if self.released {
            return Err(ScriptError::Released);
        }

        let hook = self.hook;
        let commands = self.commands()?.to_vec();
        let mut outcome = ScriptOutcome::new();
        for command in &commands {
            Self::execute_command(hook, command, bindings, &mut outcome)?;
        }
        Ok(outcome)
    }

    fn release(&mut self) {
        self.released = true;
        self.compiled = None;
    }
}

/// Creates [`HookScriptEngine`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HookScriptEngineFactory;

impl HookScriptEngineFactory {
    /// Creates a new factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ScriptEngineFactory for HookScriptEngineFactory {
    fn create(&self, hook: LifecycleHook, source: &str) -> Box<dyn ScriptEngine> {
        Box::new(HookScriptEngine::new(hook, source))
    }
}

/// Replaces `{{variable}}` with context values and `{{$project.field}}` with
/// project values. Unknown placeholders are left untouched.
fn resolve_value(value: &str, bindings: &ScriptBindings<'_>) -> String {
    PLACEHOLDER
        .replace_all(value, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            let resolved = key.strip_prefix("$project.").map_or_else(
                || bindings.context.get(key).cloned(),
                |field| project_field(bindings.project, field),
            );
            resolved.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn project_field(project: &ProjectView, field: &str) -> Option<String> {
    match field {
        "name" => Some(project.name.clone()),
        "path" => Some(project.path.clone().unwrap_or_default()),
        "resourceRoot" => Some(project.resource_root.clone()),
        "interfaceCount" => Some(project.interface_count.to_string()),
        "testSuiteCount" => Some(project.test_suite_count.to_string()),
        "mockServiceCount" => Some(project.mock_service_count.to_string()),
        _ => None,
    }
}

fn evaluate_condition(condition: &str, bindings: &ScriptBindings<'_>) -> bool {
    let condition = condition.trim();

    if let Some((left, right)) = condition.split_once("==") {
        return resolve_value(left.trim(), bindings) == resolve_value(right.trim(), bindings);
    }

    if let Some((left, right)) = condition.split_once("!=") {
        return resolve_value(left.trim(), bindings) != resolve_value(right.trim(), bindings);
    }

    if let Some((left, right)) = condition.split_once(">=") {
        return compare_numeric(left, right, bindings, |a, b| a >= b);
    }

    if let Some((left, right)) = condition.split_once("<=") {
        return compare_numeric(left, right, bindings, |a, b| a <= b);
    }

    if let Some((left, right)) = condition.split_once('>') {
        return compare_numeric(left, right, bindings, |a, b| a > b);
    }

    if let Some((left, right)) = condition.split_once('<') {
        return compare_numeric(left, right, bindings, |a, b| a < b);
    }

    let resolved = resolve_value(condition, bindings);
    !resolved.is_empty() && resolved != "false" && resolved != "0"
}

fn compare_numeric<F>(left: &str, right: &str, bindings: &ScriptBindings<'_>, cmp: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    let left = resolve_value(left.trim(), bindings);
    let right = resolve_value(right.trim(), bindings);

    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(l), Ok(r)) => cmp(l, r),
        _ => false,
    }
}
