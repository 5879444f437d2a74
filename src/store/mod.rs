pub mod disk;
pub mod memory;

use crate::core::cache::RateCache;
use disk::JsonFileStore;
use memory::MemoryStore;
use std::path::Path;
use std::sync::Arc;

/// Rate cache persisted to the JSON file at `path`.
pub fn file_cache(path: &Path) -> RateCache {
    RateCache::new(Arc::new(JsonFileStore::new(path)))
}

/// Rate cache that lives only as long as the process.
pub fn memory_cache() -> RateCache {
    RateCache::new(Arc::new(MemoryStore::new()))
}
