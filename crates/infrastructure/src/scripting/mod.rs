//! Default hook script language.
//!
//! A small line-oriented command language bound to the project lifecycle
//! hooks. Values may reference context variables with `{{name}}` and the
//! project with `{{$project.name}}`, `{{$project.path}}`,
//! `{{$project.resourceRoot}}` and the `{{$project.*Count}}` counters.

mod executor;
mod parser;

pub use executor::{HookScriptEngine, HookScriptEngineFactory};
pub use parser::{ParseError, parse_script};
