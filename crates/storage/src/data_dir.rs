//! Storage roots
//!
//! A [`DataDir`] is one storage root on disk, owning three subtrees:
//! `data/` for tablet rowset files, `meta/` for persisted headers, and
//! `snapshot/` for snapshot directories. Snapshot deletion is only ever
//! permitted for paths under a registered root's `snapshot/` subtree.

use crate::meta_store::TabletMetaStore;
use lamina_core::{Result, TabletIdent};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory name of the snapshot subtree under a storage root
pub const SNAPSHOT_PREFIX: &str = "snapshot";

/// Directory name of the tablet data subtree under a storage root
pub const DATA_PREFIX: &str = "data";

/// One storage root
#[derive(Debug)]
pub struct DataDir {
    root: PathBuf,
    meta_store: TabletMetaStore,
}

impl DataDir {
    /// Open a storage root, creating its subtrees if absent
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(DATA_PREFIX))?;
        fs::create_dir_all(root.join(SNAPSHOT_PREFIX))?;
        let meta_store = TabletMetaStore::new(&root);
        info!(root = %root.display(), "opened storage root");
        Ok(DataDir { root, meta_store })
    }

    /// Root path of this store
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// The `snapshot/` subtree of this root
    pub fn snapshot_root(&self) -> PathBuf {
        self.root.join(SNAPSHOT_PREFIX)
    }

    /// Data directory of one tablet: `data/<tablet_id>/<schema_hash>`
    pub fn tablet_data_dir(&self, ident: TabletIdent) -> PathBuf {
        self.root
            .join(DATA_PREFIX)
            .join(ident.tablet_id.to_string())
            .join(ident.schema_hash.to_string())
    }

    /// Persisted header store of this root
    pub fn meta_store(&self) -> &TabletMetaStore {
        &self.meta_store
    }
}
