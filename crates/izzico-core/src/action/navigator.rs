//! Router port used by navigation-style handlers.

use crate::error::Result;

/// Client-side router of the hosting application.
pub trait Navigator: Send + Sync {
    /// Path of the page currently displayed.
    fn current_path(&self) -> String;

    /// Navigates to `path`. This may unload the current page.
    fn push(&self, path: &str) -> Result<()>;
}
