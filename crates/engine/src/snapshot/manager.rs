//! Snapshot orchestration
//!
//! `SnapshotManager` coordinates id allocation, rowset selection, header
//! rebuild, file linking and rollback. It is constructed by the storage
//! engine context and handed to callers by reference; there is no
//! process-wide instance.
//!
//! Locking discipline for the full path: the tablet metadata read lock
//! covers target-version validation, rowset capture and the header load,
//! and is released before any file is linked. Linking can be slow on
//! wide tablets and must not stall metadata readers/writers engine-wide.
//! Releasing early is safe only because the captured `Arc<Rowset>`
//! handles pin the backing files for the remainder of the operation.
//! The incremental path instead holds the lock end to end: it has no
//! expensive clone-and-revise step, and staying locked keeps the
//! persisted header and the linked file set trivially consistent.

use crate::snapshot::header::HeaderSnapshotBuilder;
use crate::snapshot::id_alloc::SnapshotIdAllocator;
use crate::snapshot::linker::FileLinker;
use crate::snapshot::path_guard::PathGuard;
use crate::snapshot::request::SnapshotRequest;
use crate::snapshot::trailing_delta::{InertTrailingDelta, TrailingDeltaPolicy};
use lamina_core::{Error, Result, TabletIdent, Version};
use lamina_storage::{DataDir, Tablet, TabletManager};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Materializes and tears down tablet snapshots
pub struct SnapshotManager {
    tablet_manager: Arc<TabletManager>,
    id_allocator: SnapshotIdAllocator,
    path_guard: PathGuard,
    trailing_delta: Box<dyn TrailingDeltaPolicy>,
}

impl SnapshotManager {
    /// Create a manager over the registered storage roots, with the
    /// default (inert) trailing-delta policy
    pub fn new(tablet_manager: Arc<TabletManager>, stores: Vec<Arc<DataDir>>) -> Self {
        Self::with_trailing_delta(tablet_manager, stores, Box::new(InertTrailingDelta))
    }

    /// Create a manager with an explicit trailing-delta policy
    pub fn with_trailing_delta(
        tablet_manager: Arc<TabletManager>,
        stores: Vec<Arc<DataDir>>,
        trailing_delta: Box<dyn TrailingDeltaPolicy>,
    ) -> Self {
        SnapshotManager {
            tablet_manager,
            id_allocator: SnapshotIdAllocator::new(1),
            path_guard: PathGuard::new(stores),
            trailing_delta,
        }
    }

    /// Materialize a snapshot for `request`, returning the canonical
    /// snapshot directory path.
    ///
    /// Dispatches to the incremental path when `missing_versions` is
    /// set, else to the full path. Any failure removes whatever was
    /// built before it propagates.
    pub fn make_snapshot(&self, request: &mut SnapshotRequest) -> Result<PathBuf> {
        let ident = TabletIdent::new(request.tablet_id, request.schema_hash);
        let tablet = self
            .tablet_manager
            .get_tablet(request.tablet_id, request.schema_hash)
            .ok_or_else(|| {
                warn!(tablet = %ident, "snapshot request for unknown tablet");
                Error::TabletNotFound(ident)
            })?;

        let result = if request.is_incremental() {
            // Compatibility signal for older callers; set regardless of
            // outcome, it has no effect on construction itself.
            request.allow_incremental_clone = true;
            self.create_incremental_snapshot(&tablet, request)
        } else {
            self.create_full_snapshot(&tablet, request)
        };

        match &result {
            Ok(path) => info!(tablet = %ident, path = %path.display(), "made snapshot"),
            Err(err) => warn!(tablet = %ident, error = %err, "failed to make snapshot"),
        }
        result
    }

    /// Tear down a snapshot directory previously returned by
    /// [`make_snapshot`](Self::make_snapshot).
    ///
    /// The path is caller-supplied: it is admitted only if it
    /// canonicalizes strictly under a registered storage root's
    /// `snapshot/` subtree, and nothing is deleted otherwise.
    pub fn release_snapshot(&self, path: &Path) -> Result<()> {
        let canonical = self.path_guard.check_release_path(path)?;
        fs::remove_dir_all(&canonical)?;
        info!(path = %canonical.display(), "released snapshot");
        Ok(())
    }

    /// Allocate the snapshot id directory and its
    /// `<tablet_id>/<schema_hash>` subdirectory, clearing any stale
    /// leftovers from an earlier failed attempt. Returns the canonical
    /// id path and the schema-hash directory.
    fn prepare_snapshot_dirs(&self, tablet: &Tablet) -> Result<(PathBuf, PathBuf)> {
        let id_path = self.id_allocator.allocate(tablet.data_dir().path())?;
        let schema_hash_dir = id_path
            .join(tablet.tablet_id().to_string())
            .join(tablet.schema_hash().to_string());

        if schema_hash_dir.exists() {
            debug!(path = %schema_hash_dir.display(), "removing stale snapshot directory");
            fs::remove_dir_all(&schema_hash_dir)?;
        }
        fs::create_dir_all(&schema_hash_dir)?;

        let canonical_id_path = id_path.canonicalize()?;
        Ok((canonical_id_path, schema_hash_dir))
    }

    fn create_full_snapshot(
        &self,
        tablet: &Arc<Tablet>,
        request: &SnapshotRequest,
    ) -> Result<PathBuf> {
        let (id_path, schema_hash_dir) = self.prepare_snapshot_dirs(tablet)?;
        match self.build_full_snapshot(tablet, request, &schema_hash_dir) {
            Ok(()) => Ok(id_path),
            Err(err) => {
                self.rollback_snapshot_dir(&id_path, &err);
                Err(err)
            }
        }
    }

    fn build_full_snapshot(
        &self,
        tablet: &Arc<Tablet>,
        request: &SnapshotRequest,
        schema_hash_dir: &Path,
    ) -> Result<()> {
        let guard = tablet.read();

        let latest = guard.max_version_rowset().ok_or_else(|| {
            warn!(tablet = %tablet.ident(), "tablet has no committed versions");
            Error::VersionNotExist(Version::singleton(0))
        })?;

        let mut target_version = latest.end_version();
        if let Some(requested) = request.version {
            // The caller's view of "version N" must match what the
            // tablet actually has at N before trusting it as the
            // snapshot point.
            let fingerprint_mismatch = latest.version().is_singleton()
                && latest.end_version() == requested
                && request.version_hash.map_or(false, |h| h != latest.version_hash());
            if latest.end_version() < requested || fingerprint_mismatch {
                warn!(
                    tablet = %tablet.ident(),
                    requested,
                    max = latest.end_version(),
                    "invalid snapshot version requested"
                );
                return Err(Error::InvalidSnapshotVersion {
                    requested,
                    max: latest.end_version(),
                });
            }
            target_version = requested;
        }

        let consistent = guard.capture_consistent_rowsets(target_version)?;

        let builder = HeaderSnapshotBuilder::new(tablet.data_dir().clone(), tablet.ident());
        let mut header = builder.load_fresh()?;

        // Linking below can take a while. Dropping the metadata lock
        // here is safe only because `consistent` holds strong rowset
        // references, which pin the backing files against concurrent
        // compaction for the rest of this function.
        drop(guard);

        HeaderSnapshotBuilder::revise(&mut header, &consistent);
        HeaderSnapshotBuilder::persist(&header, schema_hash_dir)?;

        FileLinker::new(schema_hash_dir).link_all(&consistent)?;

        // A snapshot cut at an explicit version may end in a cumulative
        // rowset, leaving the snapshot without a singleton latest
        // version. Consult the policy for a placeholder trailing delta.
        if let Some(requested) = request.version {
            let tail_is_cumulative = consistent
                .iter()
                .any(|rs| rs.end_version() == requested && rs.start_version() != requested);
            if tail_is_cumulative {
                debug!(
                    tablet = %tablet.ident(),
                    requested,
                    "snapshot tail is a cumulative rowset"
                );
                if let Some(extra) = self.trailing_delta.synthesize(tablet.ident(), requested)? {
                    header.add_rs_meta(extra);
                    HeaderSnapshotBuilder::persist(&header, schema_hash_dir)?;
                }
            }
        }

        Ok(())
    }

    fn create_incremental_snapshot(
        &self,
        tablet: &Arc<Tablet>,
        request: &SnapshotRequest,
    ) -> Result<PathBuf> {
        let missing = request.missing_versions.as_deref().unwrap_or_default();
        if missing.is_empty() {
            return Err(Error::InputParameter(
                "incremental snapshot requires at least one missing version".to_string(),
            ));
        }

        let (id_path, schema_hash_dir) = self.prepare_snapshot_dirs(tablet)?;
        match self.build_incremental_snapshot(tablet, missing, &schema_hash_dir) {
            Ok(()) => Ok(id_path),
            Err(err) => {
                self.rollback_snapshot_dir(&id_path, &err);
                Err(err)
            }
        }
    }

    fn build_incremental_snapshot(
        &self,
        tablet: &Arc<Tablet>,
        missing: &[i64],
        schema_hash_dir: &Path,
    ) -> Result<()> {
        // Held for the whole operation; see the module docs.
        let guard = tablet.read();

        // Raw passthrough: the receiving side merges this header against
        // its existing base, so it is persisted untrimmed.
        let builder = HeaderSnapshotBuilder::new(tablet.data_dir().clone(), tablet.ident());
        let header = builder.load_fresh()?;
        HeaderSnapshotBuilder::persist(&header, schema_hash_dir)?;

        let linker = FileLinker::new(schema_hash_dir);
        for &missed in missing {
            let version = Version::singleton(missed);
            match guard.rowset_at(version) {
                Some(rowset) => {
                    debug!(
                        tablet = %tablet.ident(),
                        version = %version,
                        "linking missed version into incremental snapshot"
                    );
                    linker.link(&rowset)?;
                }
                None => {
                    warn!(
                        tablet = %tablet.ident(),
                        version = %version,
                        "missed version not committed as a singleton rowset"
                    );
                    return Err(Error::VersionNotExist(version));
                }
            }
        }

        Ok(())
    }

    /// Best-effort removal of a failed snapshot's id directory. The
    /// original construction error dominates; a cleanup failure is
    /// logged and swallowed.
    fn rollback_snapshot_dir(&self, snapshot_id_path: &Path, err: &Error) {
        warn!(
            path = %snapshot_id_path.display(),
            error = %err,
            "snapshot construction failed, removing directory"
        );
        if let Err(cleanup) = fs::remove_dir_all(snapshot_id_path) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!(
                    path = %snapshot_id_path.display(),
                    error = %cleanup,
                    "failed to remove snapshot directory"
                );
            }
        }
    }
}
