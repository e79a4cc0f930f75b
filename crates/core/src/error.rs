//! Error types for the lamina tablet engine
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Snapshot construction failures are all local, recoverable-by-caller
//! conditions: none of them is fatal to the process, and none is retried
//! internally.

use crate::types::{TabletIdent, Version};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for lamina operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the lamina tablet engine
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations, directory creation, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Semantically invalid request field
    #[error("Invalid input parameter: {0}")]
    InputParameter(String),

    /// No tablet registered under the requested `(tablet_id, schema_hash)`
    #[error("Tablet not found: {0}")]
    TabletNotFound(TabletIdent),

    /// Requested version is absent from the tablet's committed rowsets
    #[error("Version not exist: {0}")]
    VersionNotExist(Version),

    /// Requested snapshot version exceeds the tablet's max committed
    /// version, or its fingerprint disagrees with the tablet's at the
    /// same version
    #[error("Invalid snapshot version: requested {requested}, tablet max is {max}")]
    InvalidSnapshotVersion {
        /// Version the caller asked to snapshot at
        requested: i64,
        /// Max committed version the tablet actually has
        max: i64,
    },

    /// The committed rowsets admit no gap-free cover ending exactly at
    /// the target version
    #[error("No consistent rowset cover for [0-{target}]")]
    VersionSelectionFailed {
        /// Upper bound of the requested cover
        target: i64,
    },

    /// Writing the trimmed header copy into the snapshot directory failed
    #[error("Failed to persist snapshot header to {}: {reason}", .path.display())]
    HeaderPersistFailed {
        /// Header file path inside the snapshot directory
        path: PathBuf,
        /// Underlying persist failure
        reason: String,
    },

    /// Hard-linking a rowset file into the snapshot directory failed
    #[error("Failed to hard link {} -> {}: {source}", .from.display(), .to.display())]
    LinkFailed {
        /// Source file inside the tablet's data directory
        from: PathBuf,
        /// Target path inside the snapshot directory
        to: PathBuf,
        /// Underlying filesystem error
        source: io::Error,
    },

    /// Release-time validation failure: the caller-supplied path does not
    /// canonicalize under a registered storage root's snapshot subtree
    #[error("Illegal snapshot path: {}", .0.display())]
    IllegalSnapshotPath(PathBuf),

    /// Snapshot id allocation failure
    #[error("Snapshot allocation failed: {0}")]
    AllocationFailed(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let err = Error::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_display_tablet_not_found() {
        let err = Error::TabletNotFound(TabletIdent::new(15007, 368169781));
        let msg = err.to_string();
        assert!(msg.contains("Tablet not found"));
        assert!(msg.contains("15007.368169781"));
    }

    #[test]
    fn test_error_display_version_not_exist() {
        let err = Error::VersionNotExist(Version::singleton(99));
        let msg = err.to_string();
        assert!(msg.contains("Version not exist"));
        assert!(msg.contains("[99-99]"));
    }

    #[test]
    fn test_error_display_invalid_snapshot_version() {
        let err = Error::InvalidSnapshotVersion {
            requested: 25,
            max: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("25"));
        assert!(msg.contains("20"));
    }

    #[test]
    fn test_error_display_version_selection_failed() {
        let err = Error::VersionSelectionFailed { target: 18 };
        assert!(err.to_string().contains("[0-18]"));
    }

    #[test]
    fn test_error_display_link_failed() {
        let err = Error::LinkFailed {
            from: PathBuf::from("/data/1_0.dat"),
            to: PathBuf::from("/snap/1_0.dat"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/1_0.dat"));
        assert!(msg.contains("/snap/1_0.dat"));
    }

    #[test]
    fn test_error_display_illegal_snapshot_path() {
        let err = Error::IllegalSnapshotPath(PathBuf::from("/etc/passwd"));
        assert!(err.to_string().contains("/etc/passwd"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let result: std::result::Result<Version, serde_json::Error> =
            serde_json::from_str("not json");
        let err: Error = result.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        fn returns_error() -> Result<i32> {
            Err(Error::InputParameter("empty missing_versions".to_string()))
        }

        assert_eq!(returns_result().unwrap(), 42);
        assert!(returns_error().is_err());
    }
}
