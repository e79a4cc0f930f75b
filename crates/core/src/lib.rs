//! Core types for the lamina tablet engine
//!
//! This crate defines the foundational types used throughout the system:
//! - TabletId / SchemaHash / VersionHash: tablet and rowset identity
//! - TabletIdent: composite tablet key (tablet_id + schema_hash)
//! - Version: inclusive version range carried by every rowset
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{SchemaHash, TabletId, TabletIdent, Version, VersionHash};
