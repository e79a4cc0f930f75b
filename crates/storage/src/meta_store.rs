//! Persisted tablet headers, one store per storage root
//!
//! Headers live under `<root>/meta/<tablet_id>/<schema_hash>.hdr`. The
//! snapshot subsystem always reads its header copy from here rather than
//! from the live in-memory tablet, so what lands in a snapshot is the
//! durably committed state.

use crate::meta::TabletMeta;
use lamina_core::{Result, TabletIdent};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name holding persisted headers under a storage root
pub const META_PREFIX: &str = "meta";

/// Header store rooted at one storage root's `meta/` subtree
#[derive(Debug, Clone)]
pub struct TabletMetaStore {
    meta_root: PathBuf,
}

impl TabletMetaStore {
    /// Create a store under `root/meta`
    pub fn new(root: &Path) -> Self {
        TabletMetaStore {
            meta_root: root.join(META_PREFIX),
        }
    }

    /// Path of the persisted header for `ident`
    pub fn header_path(&self, ident: TabletIdent) -> PathBuf {
        self.meta_root
            .join(ident.tablet_id.to_string())
            .join(format!("{}.hdr", ident.schema_hash))
    }

    /// Persist `meta` as the durable header for its tablet
    pub fn save_header(&self, meta: &TabletMeta) -> Result<()> {
        let path = self.header_path(meta.ident());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        meta.save(&path)?;
        debug!(tablet = %meta.ident(), path = %path.display(), "saved tablet header");
        Ok(())
    }

    /// Load the durable header for `ident`
    pub fn load_header(&self, ident: TabletIdent) -> Result<TabletMeta> {
        TabletMeta::load(&self.header_path(ident))
    }

    /// Remove the durable header for `ident`, if present
    pub fn remove_header(&self, ident: TabletIdent) -> Result<()> {
        let path = self.header_path(ident);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
