//! Snapshot header construction
//!
//! A snapshot's header is a trimmed copy of the tablet's persisted
//! header: it is loaded fresh from the meta store (not taken from the
//! live in-memory object), its rowset list is revised down to exactly
//! the consistent set being linked, and it is written into the
//! snapshot's schema-hash directory as `<tablet_id>.hdr`.

use lamina_core::{Error, Result, TabletIdent};
use lamina_storage::{DataDir, Rowset, TabletMeta};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Builds and persists header copies for one tablet's snapshots
pub struct HeaderSnapshotBuilder {
    data_dir: Arc<DataDir>,
    ident: TabletIdent,
}

impl HeaderSnapshotBuilder {
    /// Create a builder for `ident` on its storage root
    pub fn new(data_dir: Arc<DataDir>, ident: TabletIdent) -> Self {
        HeaderSnapshotBuilder { data_dir, ident }
    }

    /// Load a fresh header copy from the persisted meta store
    pub fn load_fresh(&self) -> Result<TabletMeta> {
        self.data_dir.meta_store().load_header(self.ident)
    }

    /// Revise a header copy so its rowset list is exactly `consistent`
    pub fn revise(meta: &mut TabletMeta, consistent: &[Arc<Rowset>]) {
        let rs_metas = consistent.iter().map(|rs| rs.meta().clone()).collect();
        meta.revise_rs_metas(rs_metas);
    }

    /// Persist a header copy into the snapshot's schema-hash directory,
    /// returning the header path
    pub fn persist(meta: &TabletMeta, schema_hash_dir: &Path) -> Result<PathBuf> {
        let path = schema_hash_dir.join(TabletMeta::header_file_name(meta.tablet_id));
        meta.save(&path).map_err(|e| Error::HeaderPersistFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(path)
    }
}
