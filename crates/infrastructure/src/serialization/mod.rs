//! JSON serialization for project files and settings.
//!
//! Project files are written with:
//! - Document field order preserved
//! - 2-space indentation, or compact output when pretty printing is off
//! - Trailing newline
//! - UTF-8 encoding without BOM

mod codec;
mod json;

pub use codec::JsonDocumentCodec;
pub use json::*;
