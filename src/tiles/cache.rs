use crate::core::geo::TileCoord;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

const DEFAULT_CAPACITY: usize = 512;

/// In-memory tile cache using LRU eviction. Clones share storage.
#[derive(Debug, Clone)]
pub struct TileCache {
    cache: Arc<Mutex<LruCache<TileCoord, Arc<Vec<u8>>>>>,
}

impl TileCache {
    /// Create a new tile cache with the given capacity (zero falls back to the default)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Get a tile from the cache, marking it recently used
    pub fn get(&self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        self.cache.lock().ok()?.get(coord).cloned()
    }

    /// Insert a tile into the cache
    pub fn insert(&self, coord: TileCoord, data: Vec<u8>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(coord, Arc::new(data));
        }
    }

    /// Check if a tile is in the cache without touching its recency
    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.cache
            .lock()
            .map(|cache| cache.contains(coord))
            .unwrap_or(false)
    }

    /// Clear all tiles from the cache
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// Get the current number of cached tiles
    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.cache.lock().map(|cache| cache.cap().get()).unwrap_or(0)
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
