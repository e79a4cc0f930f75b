//! Columnar schema descriptor
//!
//! The schema travels inside every persisted tablet header. Field
//! mapping is a plain struct-to-struct concern handled by serde derives;
//! counts that the header reports (key columns, nullable columns) are
//! derived from the column list rather than stored alongside it, so the
//! two can never disagree.

use serde::{Deserialize, Serialize};

/// Default false-positive probability for column bloom filters when the
/// descriptor does not carry one.
pub const BLOOM_FILTER_DEFAULT_FPP: f64 = 0.05;

/// Key model of a tablet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeysType {
    /// Rows with equal keys are aggregated on merge
    AggKeys,
    /// Rows with equal keys are deduplicated, last write wins
    UniqueKeys,
    /// Duplicate keys are kept as-is
    DupKeys,
}

/// Block compression applied to column data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressKind {
    /// No compression
    None,
    /// LZ4 frame compression
    Lz4,
}

/// One column of a tablet schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabletColumn {
    /// Column id, unique within the tablet across schema changes
    pub unique_id: u32,
    /// Column name
    pub name: String,
    /// Field type name (owned by the columnar format, carried verbatim)
    pub col_type: String,
    /// True for key columns
    pub is_key: bool,
    /// True if the column admits NULL
    pub is_nullable: bool,
    /// Default value literal, if declared
    #[serde(default)]
    pub default_value: Option<String>,
    /// Decimal precision; present only for decimal columns
    #[serde(default)]
    pub precision: Option<u32>,
    /// Decimal fraction digits
    #[serde(default)]
    pub frac: Option<u32>,
    /// Fixed storage length in bytes
    pub length: u32,
    /// Length used in short-key index entries
    pub index_length: u32,
    /// True if a bloom filter is maintained for this column
    #[serde(default)]
    pub is_bf_column: bool,
    /// Id of the column this one references (materialized rollups)
    #[serde(default)]
    pub referenced_column_id: Option<u32>,
}

impl TabletColumn {
    /// True for decimal-typed columns
    pub fn is_decimal(&self) -> bool {
        self.precision.is_some()
    }
}

/// Tablet schema descriptor: columns plus layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabletSchema {
    /// Columns in storage order
    pub columns: Vec<TabletColumn>,
    /// How many leading key columns participate in the short-key index
    pub num_short_key_columns: u32,
    /// Rows per row block in the columnar files
    pub num_rows_per_row_block: u32,
    /// Key model
    pub keys_type: KeysType,
    /// Block compression
    pub compress_kind: CompressKind,
    /// Next unique id to hand out when a column is added
    pub next_column_unique_id: u32,
    /// Bloom filter false-positive probability
    #[serde(default = "default_bf_fpp")]
    pub bf_fpp: f64,
}

fn default_bf_fpp() -> f64 {
    BLOOM_FILTER_DEFAULT_FPP
}

impl TabletSchema {
    /// Total number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of key columns
    pub fn num_key_columns(&self) -> usize {
        self.columns.iter().filter(|c| c.is_key).count()
    }

    /// Number of nullable columns
    pub fn num_null_columns(&self) -> usize {
        self.columns.iter().filter(|c| c.is_nullable).count()
    }

    /// Fixed row size: column lengths plus the null bitmap
    pub fn row_size(&self) -> usize {
        let data: usize = self.columns.iter().map(|c| c.length as usize).sum();
        data + (self.num_columns() + 7) / 8
    }
}
