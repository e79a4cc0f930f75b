//! Snapshot id allocation
//!
//! A snapshot id is `<timestamp>.<sequence>`: wall-clock time at second
//! granularity plus an in-process strictly increasing counter. Both are
//! captured inside one mutex-guarded critical section, so two requests
//! arriving within the same clock tick still get distinct directories.
//! The allocator's mutex is its own; it is never held together with any
//! tablet metadata lock.

use chrono::Local;
use lamina_core::{Error, Result};
use lamina_storage::SNAPSHOT_PREFIX;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Allocates unique snapshot id paths under a storage root
pub struct SnapshotIdAllocator {
    next_seq: Mutex<u64>,
}

impl SnapshotIdAllocator {
    /// Create an allocator starting at `base_seq`
    pub fn new(base_seq: u64) -> Self {
        SnapshotIdAllocator {
            next_seq: Mutex::new(base_seq),
        }
    }

    /// Allocate `<store_root>/snapshot/<timestamp>.<sequence>`.
    ///
    /// Ids are unique for the lifetime of this allocator.
    pub fn allocate(&self, store_root: &Path) -> Result<PathBuf> {
        let mut next_seq = self.next_seq.lock();
        let time_str = Local::now().format("%Y%m%d%H%M%S").to_string();
        let seq = *next_seq;
        *next_seq = next_seq
            .checked_add(1)
            .ok_or_else(|| Error::AllocationFailed("snapshot sequence exhausted".to_string()))?;
        Ok(store_root
            .join(SNAPSHOT_PREFIX)
            .join(format!("{}.{}", time_str, seq)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_allocate_shape() {
        let alloc = SnapshotIdAllocator::new(1);
        let path = alloc.allocate(Path::new("/store0")).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        let (ts, seq) = name.split_once('.').unwrap();
        assert_eq!(ts.len(), 14);
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(seq, "1");
        assert_eq!(path.parent().unwrap(), Path::new("/store0/snapshot"));
    }

    #[test]
    fn test_same_tick_allocations_distinct() {
        let alloc = SnapshotIdAllocator::new(1);
        let a = alloc.allocate(Path::new("/store0")).unwrap();
        let b = alloc.allocate(Path::new("/store0")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_concurrent_allocations_distinct() {
        let alloc = Arc::new(SnapshotIdAllocator::new(1));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let alloc = alloc.clone();
                thread::spawn(move || alloc.allocate(Path::new("/store0")).unwrap())
            })
            .collect();

        let paths: HashSet<PathBuf> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(paths.len(), 8);
    }

    #[test]
    fn test_sequence_exhaustion_fails() {
        let alloc = SnapshotIdAllocator::new(u64::MAX);
        let err = alloc.allocate(Path::new("/store0")).unwrap_err();
        assert!(matches!(err, Error::AllocationFailed(_)));
    }
}
