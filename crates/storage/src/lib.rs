//! Tablet storage layer for lamina
//!
//! This crate implements the on-disk tablet data model consumed by the
//! snapshot subsystem:
//! - TabletSchema: columnar schema descriptor
//! - RowsetMeta / Rowset: immutable version-ranged data units with
//!   hard-link file replication
//! - TabletMeta: serializable tablet header (schema + rowset list)
//! - TabletMetaStore: persisted headers per storage root
//! - DataDir: storage root owning `data/`, `meta/` and `snapshot/` subtrees
//! - Tablet: RwLock-guarded committed state with consistent-cover capture
//! - TabletManager: concurrent `(tablet_id, schema_hash)` registry

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod data_dir;
pub mod meta;
pub mod meta_store;
pub mod rowset;
pub mod schema;
pub mod tablet;
pub mod tablet_manager;

pub use data_dir::{DataDir, SNAPSHOT_PREFIX};
pub use meta::TabletMeta;
pub use meta_store::TabletMetaStore;
pub use rowset::{Rowset, RowsetMeta};
pub use schema::{CompressKind, KeysType, TabletColumn, TabletSchema};
pub use tablet::{Tablet, TabletReadGuard};
pub use tablet_manager::TabletManager;
