//! Release-path validation
//!
//! The path handed to `release_snapshot` is caller-supplied and gates a
//! recursive delete, so it is never trusted as-is: it must canonicalize
//! to somewhere strictly inside a registered storage root's `snapshot/`
//! subtree. The comparison is component-wise, not a string prefix check,
//! so `<root>/snapshotXYZ` and the `snapshot/` directory itself are both
//! rejected.

use lamina_core::{Error, Result};
use lamina_storage::{DataDir, SNAPSHOT_PREFIX};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Validates caller-supplied snapshot paths against registered storage
/// roots
pub struct PathGuard {
    stores: Vec<Arc<DataDir>>,
}

impl PathGuard {
    /// Create a guard over the registered storage roots
    pub fn new(stores: Vec<Arc<DataDir>>) -> Self {
        PathGuard { stores }
    }

    /// Admit `path` for deletion, returning its canonical form.
    ///
    /// Fails with [`Error::IllegalSnapshotPath`] when the path does not
    /// exist, or does not canonicalize strictly under some registered
    /// root's `snapshot/` subtree. Never mutates the filesystem.
    pub fn check_release_path(&self, path: &Path) -> Result<PathBuf> {
        let canonical = path
            .canonicalize()
            .map_err(|_| Error::IllegalSnapshotPath(path.to_path_buf()))?;

        for store in &self.stores {
            let Ok(root) = store.path().canonicalize() else {
                continue;
            };
            let snapshot_root = root.join(SNAPSHOT_PREFIX);
            if let Ok(rest) = canonical.strip_prefix(&snapshot_root) {
                if rest.components().next().is_some() {
                    return Ok(canonical);
                }
            }
        }

        warn!(path = %path.display(), "rejected snapshot path outside registered roots");
        Err(Error::IllegalSnapshotPath(path.to_path_buf()))
    }
}
