//! Storage engine layer for lamina
//!
//! This crate orchestrates the storage layer:
//! - StorageEngine: top-level context owning storage roots, the tablet
//!   registry and the snapshot subsystem
//! - snapshot: consistent point-in-time tablet snapshots by hard link,
//!   full and incremental, plus validated teardown

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod snapshot;

pub use engine::StorageEngine;
pub use snapshot::{
    InertTrailingDelta, SnapshotManager, SnapshotRequest, TrailingDeltaPolicy,
};
