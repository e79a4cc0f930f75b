//! laminadb - columnar tablet storage engine
//!
//! Lamina stores table partitions as tablets: sets of immutable,
//! version-ranged rowsets described by a serializable header. This crate
//! re-exports the public API of the engine layers; the snapshot
//! subsystem is the primary entry point:
//!
//! ```ignore
//! use laminadb::{SnapshotRequest, StorageEngine};
//!
//! let engine = StorageEngine::open(vec!["/data/store0".into()])?;
//!
//! // Consistent point-in-time copy of a tablet, by hard link
//! let mut request = SnapshotRequest::full(15007, 368169781);
//! let path = engine.snapshot_manager().make_snapshot(&mut request)?;
//!
//! // ... transfer the directory, then tear it down
//! engine.snapshot_manager().release_snapshot(&path)?;
//! ```

pub use lamina_core::{Error, Result, SchemaHash, TabletId, TabletIdent, Version, VersionHash};
pub use lamina_engine::{
    InertTrailingDelta, SnapshotManager, SnapshotRequest, StorageEngine, TrailingDeltaPolicy,
};
pub use lamina_storage::{
    CompressKind, DataDir, KeysType, Rowset, RowsetMeta, Tablet, TabletColumn, TabletManager,
    TabletMeta, TabletMetaStore, TabletSchema,
};
