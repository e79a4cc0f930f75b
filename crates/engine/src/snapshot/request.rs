//! Snapshot requests

use lamina_core::{SchemaHash, TabletId, VersionHash};

/// A request to materialize a tablet snapshot.
///
/// Exactly one of two modes applies: **full** (no `missing_versions`)
/// snapshots a consistent cover up to a target version; **incremental**
/// (`missing_versions` set) snapshots only the named singleton versions
/// for a caller that already holds a consistent base.
#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    /// Tablet to snapshot
    pub tablet_id: TabletId,
    /// Schema variant to snapshot
    pub schema_hash: SchemaHash,
    /// Explicit target version; defaults to the tablet's max committed
    /// version when unset
    pub version: Option<i64>,
    /// Caller's fingerprint of `version`, checked against the tablet's
    /// when the max committed version is a singleton at that version
    pub version_hash: Option<VersionHash>,
    /// Exact single versions to include (incremental mode)
    pub missing_versions: Option<Vec<i64>>,
    /// Output-only compatibility flag: set by the dispatcher when the
    /// incremental path was taken, so older callers can tell the
    /// response supports incremental clone
    pub allow_incremental_clone: bool,
}

impl SnapshotRequest {
    /// Full snapshot at the tablet's current max committed version
    pub fn full(tablet_id: TabletId, schema_hash: SchemaHash) -> Self {
        SnapshotRequest {
            tablet_id,
            schema_hash,
            version: None,
            version_hash: None,
            missing_versions: None,
            allow_incremental_clone: false,
        }
    }

    /// Full snapshot at an explicit version with its fingerprint
    pub fn at_version(
        tablet_id: TabletId,
        schema_hash: SchemaHash,
        version: i64,
        version_hash: VersionHash,
    ) -> Self {
        SnapshotRequest {
            tablet_id,
            schema_hash,
            version: Some(version),
            version_hash: Some(version_hash),
            missing_versions: None,
            allow_incremental_clone: false,
        }
    }

    /// Incremental snapshot of the named missing versions
    pub fn incremental(
        tablet_id: TabletId,
        schema_hash: SchemaHash,
        missing_versions: Vec<i64>,
    ) -> Self {
        SnapshotRequest {
            tablet_id,
            schema_hash,
            version: None,
            version_hash: None,
            missing_versions: Some(missing_versions),
            allow_incremental_clone: false,
        }
    }

    /// True if the incremental path applies
    pub fn is_incremental(&self) -> bool {
        self.missing_versions.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_request_mode() {
        let req = SnapshotRequest::full(1, 10);
        assert!(!req.is_incremental());
        assert!(req.version.is_none());
        assert!(!req.allow_incremental_clone);
    }

    #[test]
    fn test_at_version_request() {
        let req = SnapshotRequest::at_version(1, 10, 15, 0xabc);
        assert!(!req.is_incremental());
        assert_eq!(req.version, Some(15));
        assert_eq!(req.version_hash, Some(0xabc));
    }

    #[test]
    fn test_incremental_request_mode() {
        let req = SnapshotRequest::incremental(1, 10, vec![5, 6]);
        assert!(req.is_incremental());
        assert_eq!(req.missing_versions.as_deref(), Some(&[5, 6][..]));
    }
}
