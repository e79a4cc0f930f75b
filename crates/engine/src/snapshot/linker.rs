//! File linking into a snapshot directory
//!
//! Thin driver over the rowsets' own hard-link replication capability:
//! each selected rowset replicates its files into the snapshot's
//! schema-hash directory and reports what it linked. No bytes move.

use lamina_core::Result;
use lamina_storage::Rowset;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Links selected rowsets' files into one snapshot directory
pub struct FileLinker<'a> {
    schema_hash_dir: &'a Path,
}

impl<'a> FileLinker<'a> {
    /// Create a linker targeting the snapshot's schema-hash directory
    pub fn new(schema_hash_dir: &'a Path) -> Self {
        FileLinker { schema_hash_dir }
    }

    /// Link one rowset's files, returning the linked paths
    pub fn link(&self, rowset: &Rowset) -> Result<Vec<PathBuf>> {
        rowset.link_files_to(self.schema_hash_dir)
    }

    /// Link every rowset in order, returning the linked paths per
    /// rowset. The first failure aborts; the caller owns rollback of
    /// everything linked so far.
    pub fn link_all(&self, rowsets: &[Arc<Rowset>]) -> Result<Vec<Vec<PathBuf>>> {
        let mut linked = Vec::with_capacity(rowsets.len());
        for rowset in rowsets {
            linked.push(self.link(rowset)?);
        }
        debug!(
            dir = %self.schema_hash_dir.display(),
            rowsets = rowsets.len(),
            "linked rowset files into snapshot"
        );
        Ok(linked)
    }
}
