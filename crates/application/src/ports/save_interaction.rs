//! Save interaction port.
//!
//! Questions the save pipeline asks its caller. A desktop shell answers them
//! with dialogs; headless callers use [`NonInteractive`].

use std::path::{Path, PathBuf};

/// Caller decisions needed while saving.
pub trait SaveInteraction: Send + Sync {
    /// Asks for a destination for a project that has none.
    ///
    /// `suggested` is a file name such as `Petstore-project.json`.
    fn choose_destination(&self, suggested: &str) -> Option<PathBuf>;

    /// Asks whether an existing file chosen as destination may be replaced.
    fn confirm_overwrite(&self, path: &Path) -> bool;

    /// Asks for another destination because `path` is read-only.
    fn choose_writable_destination(&self, path: &Path) -> Option<PathBuf>;

    /// Asks whether to overwrite a file changed by someone else since the
    /// last load or save.
    fn confirm_external_modification(&self, path: &Path) -> bool;
}

/// Declines every question.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl SaveInteraction for NonInteractive {
    fn choose_destination(&self, _suggested: &str) -> Option<PathBuf> {
        None
    }

    fn confirm_overwrite(&self, _path: &Path) -> bool {
        false
    }

    fn choose_writable_destination(&self, _path: &Path) -> Option<PathBuf> {
        None
    }

    fn confirm_external_modification(&self, _path: &Path) -> bool {
        false
    }
}
