//! Persistence domain types for the project document.
//!
//! These types represent the on-disk tree of a project file: the project
//! root, its interface / test suite / mock service nodes, and the
//! credential leaves below interfaces. Nodes owned by external
//! collaborators keep their unknown fields verbatim.

mod common;
mod encoding;
mod interface;
mod mock_service;
mod project;
mod test_suite;

pub use common::*;
pub use encoding::*;
pub use interface::*;
pub use mock_service::*;
pub use project::*;
pub use test_suite::*;
