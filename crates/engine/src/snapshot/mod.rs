//! Tablet snapshots
//!
//! A snapshot is a point-in-time, consistent, on-disk copy of a tablet's
//! committed data: a trimmed header plus the selected rowsets' files,
//! hard-linked into
//! `<store_root>/snapshot/<timestamp>.<sequence>/<tablet_id>/<schema_hash>/`.
//! Snapshots feed clone and backup/restore; no bytes are copied and no
//! exclusive lock is held while files are linked.
//!
//! Construction never leaves a half-built directory behind: any failure
//! removes the whole snapshot id directory before the error propagates.

mod header;
mod id_alloc;
mod linker;
mod manager;
mod path_guard;
mod request;
mod trailing_delta;

pub use header::HeaderSnapshotBuilder;
pub use id_alloc::SnapshotIdAllocator;
pub use linker::FileLinker;
pub use manager::SnapshotManager;
pub use path_guard::PathGuard;
pub use request::SnapshotRequest;
pub use trailing_delta::{InertTrailingDelta, TrailingDeltaPolicy};
