//! Tracing setup and the hook script log sink.

use apiforge_application::ports::ScriptLog;
use apiforge_domain::LifecycleHook;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a global `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// Forwards hook log lines to `tracing` under the `apiforge::script` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingScriptLog;

impl ScriptLog for TracingScriptLog {
    fn log(&self, hook: LifecycleHook, message: &str) {
        tracing::info!(target: "apiforge::script", hook = %hook, "{message}");
    }
}
