//! Directory helpers.

use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Creates `path` and all of its parents. Succeeds if it already exists.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path)?;
    debug!(path = ?path, "Ensured directory");
    Ok(())
}
