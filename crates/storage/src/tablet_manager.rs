//! Tablet registry
//!
//! Concurrent map from `(tablet_id, schema_hash)` to live tablets. Owned
//! by the storage engine context and handed to the subsystems that need
//! tablet resolution; there is no process-wide instance.

use crate::tablet::Tablet;
use dashmap::DashMap;
use lamina_core::{SchemaHash, TabletId, TabletIdent};
use std::sync::Arc;
use tracing::debug;

/// Registry of live tablets
#[derive(Default)]
pub struct TabletManager {
    tablets: DashMap<TabletIdent, Arc<Tablet>>,
}

impl TabletManager {
    /// Create an empty registry
    pub fn new() -> Self {
        TabletManager {
            tablets: DashMap::new(),
        }
    }

    /// Register a tablet, replacing any previous registration under the
    /// same ident
    pub fn add_tablet(&self, tablet: Arc<Tablet>) {
        debug!(tablet = %tablet.ident(), "registered tablet");
        self.tablets.insert(tablet.ident(), tablet);
    }

    /// Look up a tablet by `(tablet_id, schema_hash)`
    pub fn get_tablet(&self, tablet_id: TabletId, schema_hash: SchemaHash) -> Option<Arc<Tablet>> {
        self.tablets
            .get(&TabletIdent::new(tablet_id, schema_hash))
            .map(|entry| entry.value().clone())
    }

    /// Drop a tablet from the registry, returning its handle if it was
    /// registered
    pub fn drop_tablet(&self, tablet_id: TabletId, schema_hash: SchemaHash) -> Option<Arc<Tablet>> {
        self.tablets
            .remove(&TabletIdent::new(tablet_id, schema_hash))
            .map(|(_, tablet)| tablet)
    }

    /// Number of registered tablets
    pub fn tablet_count(&self) -> usize {
        self.tablets.len()
    }
}
