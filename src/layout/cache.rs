use std::collections::HashMap;
use std::time::Instant;

use parking_lot::RwLock;
use xxhash_rust::xxh3::xxh3_64;

use crate::layout::packer::Row;

/// Maximum number of cached packs to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Key for the pack cache: exact container width plus a hash of the width
/// sequence.
///
/// The width is keyed exactly (by bit pattern), not bucketed: replaying rows
/// packed for even a slightly different budget could violate the strict
/// fits-under-width rule finished rows are built on.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    width_bits: u32,
    list_hash: u64,
}

#[derive(Debug, Clone)]
struct CachedPack {
    rows: Vec<Row>,
    /// When this entry was last returned, for LRU eviction.
    last_used: Instant,
}

/// Memoizes full-gallery packing passes.
///
/// Keyed by (container width, hash of the intrinsic width sequence), so any
/// resize or newly measured image misses and repacks. Only full passes are
/// cached — incremental passes over a partially assigned registry depend on
/// state the key does not capture, and the controller bypasses the cache for
/// them.
pub struct PackCache {
    cache: RwLock<HashMap<CacheKey, CachedPack>>,
}

impl PackCache {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::with_capacity(MAX_CACHE_ENTRIES)),
        }
    }

    /// Hash of an intrinsic width sequence, in registration order.
    ///
    /// Zero (unmeasured) widths participate: an image resolving its width
    /// must change the key.
    pub fn hash_widths(widths: impl Iterator<Item = f32>) -> u64 {
        let mut input = Vec::new();
        for width in widths {
            input.extend_from_slice(&width.to_bits().to_le_bytes());
        }
        xxh3_64(&input)
    }

    /// Returns the cached rows for this width/list, refreshing its LRU slot.
    /// None on miss.
    pub fn get(&self, container_width: f32, list_hash: u64) -> Option<Vec<Row>> {
        let key = CacheKey {
            width_bits: container_width.to_bits(),
            list_hash,
        };
        let mut cache = self.cache.write();
        if let Some(entry) = cache.get_mut(&key) {
            entry.last_used = Instant::now();
            return Some(entry.rows.clone());
        }
        None
    }

    /// Stores a pack result, evicting the least recently used entry at
    /// capacity.
    pub fn set(&self, container_width: f32, list_hash: u64, rows: Vec<Row>) {
        let key = CacheKey {
            width_bits: container_width.to_bits(),
            list_hash,
        };
        let entry = CachedPack {
            rows,
            last_used: Instant::now(),
        };

        let mut cache = self.cache.write();
        if cache.len() >= MAX_CACHE_ENTRIES && !cache.contains_key(&key) {
            Self::evict_oldest(&mut cache);
        }
        cache.insert(key, entry);
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    fn evict_oldest(cache: &mut HashMap<CacheKey, CachedPack>) {
        let oldest_key = cache
            .iter()
            .min_by_key(|(_, v)| v.last_used)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest_key {
            cache.remove(&key);
        }
    }
}

impl Default for PackCache {
    fn default() -> Self {
        Self::new()
    }
}
