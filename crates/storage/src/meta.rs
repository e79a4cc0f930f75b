//! Tablet header: serializable tablet metadata
//!
//! A [`TabletMeta`] is a value. Cloning one and mutating the clone's
//! rowset list never affects the live tablet, which is exactly what the
//! snapshot subsystem relies on when it trims a header copy down to the
//! consistent rowset set it actually linked.

use crate::rowset::RowsetMeta;
use crate::schema::TabletSchema;
use lamina_core::{Result, SchemaHash, TabletId, TabletIdent, Version};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable tablet header: schema, committed rowset descriptors and
/// creation statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabletMeta {
    /// Tablet identifier
    pub tablet_id: TabletId,
    /// Schema hash of this schema variant
    pub schema_hash: SchemaHash,
    /// Creation time, seconds since epoch
    pub creation_time: i64,
    /// Columnar schema descriptor
    pub schema: TabletSchema,
    /// Committed rowset descriptors, ordered by start version
    pub rs_metas: Vec<RowsetMeta>,
}

impl TabletMeta {
    /// Create a header with no committed rowsets
    pub fn new(
        tablet_id: TabletId,
        schema_hash: SchemaHash,
        creation_time: i64,
        schema: TabletSchema,
    ) -> Self {
        TabletMeta {
            tablet_id,
            schema_hash,
            creation_time,
            schema,
            rs_metas: Vec::new(),
        }
    }

    /// Composite tablet key
    pub fn ident(&self) -> TabletIdent {
        TabletIdent::new(self.tablet_id, self.schema_hash)
    }

    /// Max committed version range, by end version
    pub fn max_version(&self) -> Option<Version> {
        self.rs_metas
            .iter()
            .map(|m| m.version)
            .max_by_key(|v| v.end)
    }

    /// Replace the rowset descriptor list wholesale.
    ///
    /// Used when a header copy must reflect exactly one selected rowset
    /// set instead of everything the tablet has committed.
    pub fn revise_rs_metas(&mut self, rs_metas: Vec<RowsetMeta>) {
        self.rs_metas = rs_metas;
    }

    /// Append one rowset descriptor, keeping start-version order
    pub fn add_rs_meta(&mut self, rs_meta: RowsetMeta) {
        self.rs_metas.push(rs_meta);
        self.rs_metas.sort_by_key(|m| m.version.start);
    }

    /// Header file name inside a snapshot or meta directory
    pub fn header_file_name(tablet_id: TabletId) -> String {
        format!("{}.hdr", tablet_id)
    }

    /// Persist this header as JSON at `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load a header from `path`
    pub fn load(path: &Path) -> Result<TabletMeta> {
        let file = File::open(path)?;
        let meta = serde_json::from_reader(BufReader::new(file))?;
        Ok(meta)
    }
}
