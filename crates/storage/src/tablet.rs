//! Tablets: RwLock-guarded committed state
//!
//! A tablet owns its header plus one shared handle per committed rowset.
//! Metadata access goes through a reader/writer lock shared with the
//! rest of the engine: readers (snapshots, queries) proceed concurrently,
//! writers (version commit, compaction swap) exclude them.
//!
//! The capture capabilities return `Arc<Rowset>` handles. A caller that
//! captured handles may drop the read lock and keep using them; the
//! strong references alone keep the backing files alive.

use crate::data_dir::DataDir;
use crate::meta::TabletMeta;
use crate::rowset::{Rowset, RowsetMeta};
use lamina_core::{Error, Result, SchemaHash, TabletId, TabletIdent, Version};
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Mutable tablet state behind the metadata lock
struct TabletState {
    meta: TabletMeta,
    /// Committed rowsets keyed by start version. Committed ranges never
    /// overlap and never leave gaps below the max committed version.
    rowsets: BTreeMap<i64, Arc<Rowset>>,
}

/// A tablet: one partition of a table, unit of storage and snapshotting
pub struct Tablet {
    ident: TabletIdent,
    data_dir: Arc<DataDir>,
    state: RwLock<TabletState>,
}

impl Tablet {
    /// Build a tablet from a loaded header, materializing a shared
    /// handle per committed rowset
    pub fn from_meta(meta: TabletMeta, data_dir: Arc<DataDir>) -> Self {
        let ident = meta.ident();
        let rowset_dir = data_dir.tablet_data_dir(ident);
        let rowsets = meta
            .rs_metas
            .iter()
            .map(|rs_meta| {
                (
                    rs_meta.start_version(),
                    Arc::new(Rowset::new(rs_meta.clone(), rowset_dir.clone())),
                )
            })
            .collect();
        Tablet {
            ident,
            data_dir,
            state: RwLock::new(TabletState { meta, rowsets }),
        }
    }

    /// Composite tablet key
    pub fn ident(&self) -> TabletIdent {
        self.ident
    }

    /// Tablet identifier
    pub fn tablet_id(&self) -> TabletId {
        self.ident.tablet_id
    }

    /// Schema hash of this schema variant
    pub fn schema_hash(&self) -> SchemaHash {
        self.ident.schema_hash
    }

    /// Storage root this tablet lives on
    pub fn data_dir(&self) -> &Arc<DataDir> {
        &self.data_dir
    }

    /// Directory holding this tablet's rowset files
    pub fn tablet_data_dir(&self) -> PathBuf {
        self.data_dir.tablet_data_dir(self.ident)
    }

    /// Acquire the metadata read lock
    pub fn read(&self) -> TabletReadGuard<'_> {
        TabletReadGuard {
            state: self.state.read(),
        }
    }

    /// Commit a rowset: reject overlap, update the header, persist it,
    /// and publish the handle.
    pub fn add_rowset(&self, rs_meta: RowsetMeta) -> Result<Arc<Rowset>> {
        let mut state = self.state.write();

        for existing in state.rowsets.values() {
            let v = existing.version();
            if v.contains(rs_meta.start_version()) || rs_meta.version.contains(v.start) {
                return Err(Error::InputParameter(format!(
                    "rowset {} overlaps committed rowset {}",
                    rs_meta.version, v
                )));
            }
        }

        let rowset = Arc::new(Rowset::new(rs_meta.clone(), self.tablet_data_dir()));
        state.rowsets.insert(rs_meta.start_version(), rowset.clone());
        state.meta.add_rs_meta(rs_meta);
        self.data_dir.meta_store().save_header(&state.meta)?;

        debug!(tablet = %self.ident, version = %rowset.version(), "committed rowset");
        Ok(rowset)
    }
}

/// Read guard over a tablet's metadata.
///
/// Capture methods return shared rowset handles that outlive the guard.
pub struct TabletReadGuard<'a> {
    state: RwLockReadGuard<'a, TabletState>,
}

impl TabletReadGuard<'_> {
    /// The live header
    pub fn meta(&self) -> &TabletMeta {
        &self.state.meta
    }

    /// Number of committed rowsets
    pub fn rowset_count(&self) -> usize {
        self.state.rowsets.len()
    }

    /// The rowset holding the max committed version, if any
    pub fn max_version_rowset(&self) -> Option<Arc<Rowset>> {
        self.state
            .rowsets
            .values()
            .max_by_key(|rs| rs.end_version())
            .cloned()
    }

    /// The rowset covering exactly `version`, if committed
    pub fn rowset_at(&self, version: Version) -> Option<Arc<Rowset>> {
        self.state
            .rowsets
            .get(&version.start)
            .filter(|rs| rs.version() == version)
            .cloned()
    }

    /// Capture the minimal consistent rowset cover of `[0, target]`.
    ///
    /// The cover is exact: it must start at 0, leave no gap, and end at
    /// precisely `target`. A target that falls mid-rowset has no cover
    /// and fails with [`Error::VersionSelectionFailed`].
    pub fn capture_consistent_rowsets(&self, target: i64) -> Result<Vec<Arc<Rowset>>> {
        let mut cover = Vec::new();
        let mut cursor = 0i64;
        while cursor <= target {
            match self.state.rowsets.get(&cursor) {
                Some(rs) if rs.end_version() <= target => {
                    cursor = rs.end_version() + 1;
                    cover.push(rs.clone());
                }
                _ => {
                    return Err(Error::VersionSelectionFailed { target });
                }
            }
        }
        Ok(cover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CompressKind, KeysType, TabletSchema};

    fn schema() -> TabletSchema {
        TabletSchema {
            columns: vec![],
            num_short_key_columns: 0,
            num_rows_per_row_block: 1024,
            keys_type: KeysType::AggKeys,
            compress_kind: CompressKind::Lz4,
            next_column_unique_id: 0,
            bf_fpp: 0.05,
        }
    }

    fn rs_meta(id: u64, start: i64, end: i64) -> RowsetMeta {
        RowsetMeta {
            rowset_id: id,
            version: Version::new(start, end),
            version_hash: id * 17,
            num_rows: 10,
            data_size: 128,
            num_segments: 1,
            creation_time: 1_700_000_000,
        }
    }

    fn tablet_with_rowsets(dir: &std::path::Path) -> Tablet {
        let data_dir = Arc::new(DataDir::open(dir).unwrap());
        let tablet = Tablet::from_meta(TabletMeta::new(42, 123, 0, schema()), data_dir);
        tablet.add_rowset(rs_meta(1, 0, 10)).unwrap();
        tablet.add_rowset(rs_meta(2, 11, 15)).unwrap();
        tablet.add_rowset(rs_meta(3, 16, 20)).unwrap();
        tablet
    }

    #[test]
    fn test_capture_cover_at_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let tablet = tablet_with_rowsets(dir.path());

        let cover = tablet.read().capture_consistent_rowsets(15).unwrap();
        let versions: Vec<Version> = cover.iter().map(|rs| rs.version()).collect();
        assert_eq!(versions, vec![Version::new(0, 10), Version::new(11, 15)]);
    }

    #[test]
    fn test_capture_cover_full_range() {
        let dir = tempfile::tempdir().unwrap();
        let tablet = tablet_with_rowsets(dir.path());

        let cover = tablet.read().capture_consistent_rowsets(20).unwrap();
        assert_eq!(cover.len(), 3);
    }

    #[test]
    fn test_capture_mid_rowset_target_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tablet = tablet_with_rowsets(dir.path());

        let err = tablet.read().capture_consistent_rowsets(18).unwrap_err();
        assert!(matches!(
            err,
            Error::VersionSelectionFailed { target: 18 }
        ));
    }

    #[test]
    fn test_capture_with_gap_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = Arc::new(DataDir::open(dir.path()).unwrap());
        let tablet = Tablet::from_meta(TabletMeta::new(1, 1, 0, schema()), data_dir);
        tablet.add_rowset(rs_meta(1, 0, 10)).unwrap();
        tablet.add_rowset(rs_meta(2, 12, 15)).unwrap(); // gap at 11

        let err = tablet.read().capture_consistent_rowsets(15).unwrap_err();
        assert!(matches!(err, Error::VersionSelectionFailed { .. }));
    }

    #[test]
    fn test_max_version_rowset() {
        let dir = tempfile::tempdir().unwrap();
        let tablet = tablet_with_rowsets(dir.path());

        let max = tablet.read().max_version_rowset().unwrap();
        assert_eq!(max.version(), Version::new(16, 20));
    }

    #[test]
    fn test_rowset_at_exact_version_only() {
        let dir = tempfile::tempdir().unwrap();
        let tablet = tablet_with_rowsets(dir.path());
        let guard = tablet.read();

        assert!(guard.rowset_at(Version::new(11, 15)).is_some());
        assert!(guard.rowset_at(Version::singleton(11)).is_none());
        assert!(guard.rowset_at(Version::singleton(99)).is_none());
    }

    #[test]
    fn test_add_rowset_rejects_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let tablet = tablet_with_rowsets(dir.path());

        let err = tablet.add_rowset(rs_meta(9, 15, 25)).unwrap_err();
        assert!(matches!(err, Error::InputParameter(_)));
        assert_eq!(tablet.read().rowset_count(), 3);
    }

    #[test]
    fn test_add_rowset_persists_header() {
        let dir = tempfile::tempdir().unwrap();
        let tablet = tablet_with_rowsets(dir.path());

        let persisted = tablet
            .data_dir()
            .meta_store()
            .load_header(tablet.ident())
            .unwrap();
        assert_eq!(persisted.rs_metas.len(), 3);
        assert_eq!(persisted.max_version(), Some(Version::new(16, 20)));
    }

    #[test]
    fn test_captured_handles_outlive_guard() {
        let dir = tempfile::tempdir().unwrap();
        let tablet = tablet_with_rowsets(dir.path());

        let cover = {
            let guard = tablet.read();
            guard.capture_consistent_rowsets(15).unwrap()
        };
        // guard dropped; handles remain usable
        assert_eq!(cover.len(), 2);
        assert_eq!(cover[1].version(), Version::new(11, 15));
    }
}
