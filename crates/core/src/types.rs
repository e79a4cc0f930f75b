//! Tablet identity and version range types
//!
//! A tablet is addressed by `(tablet_id, schema_hash)`; the pair is
//! modeled as [`TabletIdent`] so it can be used as a map key and logged
//! as one unit. Every rowset carries a [`Version`], an inclusive range of
//! committed version numbers, plus a [`VersionHash`] fingerprint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tablet identifier assigned by the frontend.
pub type TabletId = i64;

/// Hash of the tablet schema, distinguishing co-existing schema variants
/// of the same tablet during schema change.
pub type SchemaHash = u32;

/// Fingerprint of the data committed at a version. Two replicas holding
/// the same version number but different contents disagree on this hash.
pub type VersionHash = u64;

/// Composite tablet key: `(tablet_id, schema_hash)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabletIdent {
    /// Tablet identifier
    pub tablet_id: TabletId,
    /// Schema hash of the addressed schema variant
    pub schema_hash: SchemaHash,
}

impl TabletIdent {
    /// Create a new tablet ident
    pub fn new(tablet_id: TabletId, schema_hash: SchemaHash) -> Self {
        TabletIdent {
            tablet_id,
            schema_hash,
        }
    }
}

impl fmt::Display for TabletIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tablet_id, self.schema_hash)
    }
}

/// Inclusive version range `[start, end]`.
///
/// `start == end` denotes a singleton ("single delta") rowset; `start <
/// end` a cumulative rowset covering multiple merged versions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Version {
    /// First version covered (inclusive)
    pub start: i64,
    /// Last version covered (inclusive)
    pub end: i64,
}

impl Version {
    /// Create a version range `[start, end]`
    pub fn new(start: i64, end: i64) -> Self {
        Version { start, end }
    }

    /// Create a singleton version range `[v, v]`
    pub fn singleton(v: i64) -> Self {
        Version { start: v, end: v }
    }

    /// True if this range covers exactly one version
    pub fn is_singleton(&self) -> bool {
        self.start == self.end
    }

    /// True if `v` falls inside this range
    pub fn contains(&self, v: i64) -> bool {
        self.start <= v && v <= self.end
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.start, self.end)
    }
}
