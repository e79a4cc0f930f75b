//! Rowsets: immutable, version-ranged units of committed data
//!
//! A rowset's data and index files live in the tablet's data directory
//! and are never rewritten after commit; compaction replaces whole
//! rowsets instead. Handles are shared as `Arc<Rowset>`: any holder of a
//! strong reference keeps the backing files alive regardless of what the
//! owning tablet does in the meantime, which is what lets snapshot
//! construction link files after dropping the tablet's metadata lock.
//!
//! File naming (`<rowset_id>_<segment>.dat` / `.idx`) is owned here; the
//! snapshot subsystem only ever asks a rowset to replicate itself.

use lamina_core::{Error, Result, Version, VersionHash};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serializable rowset descriptor, embedded in tablet headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowsetMeta {
    /// Rowset id, unique within the tablet
    pub rowset_id: u64,
    /// Inclusive version range this rowset covers
    pub version: Version,
    /// Fingerprint of the covered data
    pub version_hash: VersionHash,
    /// Row count
    pub num_rows: u64,
    /// Total data size in bytes
    pub data_size: u64,
    /// Number of segment files
    pub num_segments: u32,
    /// Commit time, seconds since epoch
    pub creation_time: i64,
}

impl RowsetMeta {
    /// First version covered
    pub fn start_version(&self) -> i64 {
        self.version.start
    }

    /// Last version covered
    pub fn end_version(&self) -> i64 {
        self.version.end
    }

    /// True if this rowset covers exactly one version
    pub fn is_singleton(&self) -> bool {
        self.version.is_singleton()
    }
}

/// An immutable committed rowset: descriptor plus the directory holding
/// its files.
///
/// Shared as `Arc<Rowset>`; see the module docs for the lifetime
/// guarantee that shared ownership provides.
#[derive(Debug)]
pub struct Rowset {
    meta: RowsetMeta,
    dir: PathBuf,
}

impl Rowset {
    /// Create a rowset handle over files in `dir`
    pub fn new(meta: RowsetMeta, dir: PathBuf) -> Self {
        Rowset { meta, dir }
    }

    /// Rowset descriptor
    pub fn meta(&self) -> &RowsetMeta {
        &self.meta
    }

    /// Version range covered
    pub fn version(&self) -> Version {
        self.meta.version
    }

    /// First version covered
    pub fn start_version(&self) -> i64 {
        self.meta.start_version()
    }

    /// Last version covered
    pub fn end_version(&self) -> i64 {
        self.meta.end_version()
    }

    /// Data fingerprint
    pub fn version_hash(&self) -> VersionHash {
        self.meta.version_hash
    }

    /// Directory holding this rowset's files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Data file name for one segment
    pub fn data_file_name(rowset_id: u64, segment: u32) -> String {
        format!("{}_{}.dat", rowset_id, segment)
    }

    /// Index file name for one segment
    pub fn index_file_name(rowset_id: u64, segment: u32) -> String {
        format!("{}_{}.idx", rowset_id, segment)
    }

    /// All file names belonging to this rowset, data and index per segment
    pub fn file_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.meta.num_segments as usize * 2);
        for segment in 0..self.meta.num_segments {
            names.push(Self::data_file_name(self.meta.rowset_id, segment));
            names.push(Self::index_file_name(self.meta.rowset_id, segment));
        }
        names
    }

    /// Replicate this rowset's files into `target` by hard link, without
    /// copying bytes. Returns the files that were linked.
    ///
    /// Any single link failure aborts and surfaces as
    /// [`Error::LinkFailed`]; the caller owns directory-level rollback.
    pub fn link_files_to(&self, target: &Path) -> Result<Vec<PathBuf>> {
        let mut linked = Vec::new();
        for name in self.file_names() {
            let from = self.dir.join(&name);
            let to = target.join(&name);
            fs::hard_link(&from, &to).map_err(|source| Error::LinkFailed {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
            linked.push(to);
        }
        debug!(
            rowset_id = self.meta.rowset_id,
            version = %self.meta.version,
            files = linked.len(),
            "linked rowset files"
        );
        Ok(linked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(rowset_id: u64, start: i64, end: i64, num_segments: u32) -> RowsetMeta {
        RowsetMeta {
            rowset_id,
            version: Version::new(start, end),
            version_hash: 0xfeed,
            num_rows: 100,
            data_size: 4096,
            num_segments,
            creation_time: 1_700_000_000,
        }
    }

    fn write_files(rowset: &Rowset) {
        for name in rowset.file_names() {
            fs::write(rowset.dir().join(name), b"columnar bytes").unwrap();
        }
    }

    #[test]
    fn test_file_names_cover_all_segments() {
        let rs = Rowset::new(meta(7, 0, 10, 2), PathBuf::from("/data"));
        assert_eq!(
            rs.file_names(),
            vec!["7_0.dat", "7_0.idx", "7_1.dat", "7_1.idx"]
        );
    }

    #[test]
    fn test_link_files_to() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        let rs = Rowset::new(meta(3, 0, 5, 2), src.path().to_path_buf());
        write_files(&rs);

        let linked = rs.link_files_to(dst.path()).unwrap();
        assert_eq!(linked.len(), 4);
        for path in &linked {
            assert!(path.exists());
            assert_eq!(fs::read(path).unwrap(), b"columnar bytes");
        }
    }

    #[test]
    fn test_link_shares_storage_with_source() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        let rs = Rowset::new(meta(4, 2, 2, 1), src.path().to_path_buf());
        write_files(&rs);

        rs.link_files_to(dst.path()).unwrap();

        // Removing the source directory entry must not take the linked
        // copy with it.
        fs::remove_file(src.path().join("4_0.dat")).unwrap();
        assert_eq!(
            fs::read(dst.path().join("4_0.dat")).unwrap(),
            b"columnar bytes"
        );
    }

    #[test]
    fn test_link_missing_source_fails() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        let rs = Rowset::new(meta(5, 0, 0, 1), src.path().to_path_buf());
        // no files written

        let err = rs.link_files_to(dst.path()).unwrap_err();
        assert!(matches!(err, Error::LinkFailed { .. }));
    }

    #[test]
    fn test_rowset_meta_serde_roundtrip() {
        let m = meta(9, 11, 15, 1);
        let json = serde_json::to_string(&m).unwrap();
        let back: RowsetMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
