//! Storage engine context
//!
//! Top-level service object owning the storage roots, the tablet
//! registry and the snapshot subsystem. It is constructed once by the
//! process and passed by reference to the layers that need it; nothing
//! in this crate reaches for a global instance.

use crate::snapshot::{SnapshotManager, TrailingDeltaPolicy};
use lamina_core::{Result, SchemaHash, TabletId};
use lamina_storage::{DataDir, Tablet, TabletManager, TabletMeta};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Storage engine context: storage roots, tablet registry, snapshots
pub struct StorageEngine {
    stores: Vec<Arc<DataDir>>,
    tablet_manager: Arc<TabletManager>,
    snapshot_manager: SnapshotManager,
}

impl StorageEngine {
    /// Open the engine over the given storage root paths
    pub fn open(store_roots: Vec<PathBuf>) -> Result<Self> {
        Self::open_with_trailing_delta(store_roots, None)
    }

    /// Open the engine with an explicit trailing-delta policy for the
    /// snapshot subsystem
    pub fn open_with_trailing_delta(
        store_roots: Vec<PathBuf>,
        trailing_delta: Option<Box<dyn TrailingDeltaPolicy>>,
    ) -> Result<Self> {
        let stores = store_roots
            .into_iter()
            .map(|root| DataDir::open(root).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        let tablet_manager = Arc::new(TabletManager::new());
        let snapshot_manager = match trailing_delta {
            Some(policy) => SnapshotManager::with_trailing_delta(
                tablet_manager.clone(),
                stores.clone(),
                policy,
            ),
            None => SnapshotManager::new(tablet_manager.clone(), stores.clone()),
        };
        info!(stores = stores.len(), "opened storage engine");
        Ok(StorageEngine {
            stores,
            tablet_manager,
            snapshot_manager,
        })
    }

    /// Registered storage roots
    pub fn stores(&self) -> &[Arc<DataDir>] {
        &self.stores
    }

    /// The tablet registry
    pub fn tablet_manager(&self) -> &Arc<TabletManager> {
        &self.tablet_manager
    }

    /// The snapshot subsystem
    pub fn snapshot_manager(&self) -> &SnapshotManager {
        &self.snapshot_manager
    }

    /// Create a tablet on `store` from a header: persists the header,
    /// builds the live tablet and registers it
    pub fn create_tablet(&self, meta: TabletMeta, store: &Arc<DataDir>) -> Result<Arc<Tablet>> {
        store.meta_store().save_header(&meta)?;
        std::fs::create_dir_all(store.tablet_data_dir(meta.ident()))?;
        let tablet = Arc::new(Tablet::from_meta(meta, store.clone()));
        self.tablet_manager.add_tablet(tablet.clone());
        Ok(tablet)
    }

    /// Unregister a tablet, returning its handle if it was registered
    pub fn drop_tablet(
        &self,
        tablet_id: TabletId,
        schema_hash: SchemaHash,
    ) -> Option<Arc<Tablet>> {
        self.tablet_manager.drop_tablet(tablet_id, schema_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_storage::{CompressKind, KeysType, TabletSchema};

    fn schema() -> TabletSchema {
        TabletSchema {
            columns: vec![],
            num_short_key_columns: 0,
            num_rows_per_row_block: 1024,
            keys_type: KeysType::DupKeys,
            compress_kind: CompressKind::None,
            next_column_unique_id: 0,
            bf_fpp: 0.05,
        }
    }

    #[test]
    fn test_open_engine_with_multiple_stores() {
        let dir = tempfile::tempdir().unwrap();
        let engine = StorageEngine::open(vec![
            dir.path().join("store0"),
            dir.path().join("store1"),
        ])
        .unwrap();
        assert_eq!(engine.stores().len(), 2);
    }

    #[test]
    fn test_create_tablet_persists_header_and_registers() {
        let dir = tempfile::tempdir().unwrap();
        let engine = StorageEngine::open(vec![dir.path().to_path_buf()]).unwrap();
        let store = engine.stores()[0].clone();

        let meta = TabletMeta::new(42, 123, 0, schema());
        let tablet = engine.create_tablet(meta, &store).unwrap();

        assert!(engine.tablet_manager().get_tablet(42, 123).is_some());
        assert!(store
            .meta_store()
            .load_header(tablet.ident())
            .is_ok());
        assert!(tablet.tablet_data_dir().is_dir());
    }

    #[test]
    fn test_drop_tablet() {
        let dir = tempfile::tempdir().unwrap();
        let engine = StorageEngine::open(vec![dir.path().to_path_buf()]).unwrap();
        let store = engine.stores()[0].clone();

        engine
            .create_tablet(TabletMeta::new(1, 10, 0, schema()), &store)
            .unwrap();
        assert!(engine.drop_tablet(1, 10).is_some());
        assert!(engine.tablet_manager().get_tablet(1, 10).is_none());
    }
}
