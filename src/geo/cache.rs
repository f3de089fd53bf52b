// Fri Jan 16 2026 - Alex

use ahash::AHashMap;

/// Bit patterns of `(lat1, lon1, lat2, lon2)`, so float coordinates can be hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey([u64; 4]);

impl PairKey {
    pub fn new(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Self {
        Self([lat1.to_bits(), lon1.to_bits(), lat2.to_bits(), lon2.to_bits()])
    }

    pub fn reversed(&self) -> Self {
        let [a, b, c, d] = self.0;
        Self([c, d, a, b])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn merge(&mut self, other: &CacheStats) {
        self.entries += other.entries;
        self.hits += other.hits;
        self.misses += other.misses;
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct DistanceCache {
    entries: AHashMap<PairKey, f64>,
    hits: u64,
    misses: u64,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Looks the pair up as given, then with its endpoints swapped.
    pub fn get(&mut self, key: &PairKey) -> Option<f64> {
        let found = self
            .entries
            .get(key)
            .or_else(|| self.entries.get(&key.reversed()))
            .copied();

        match found {
            Some(_) => self.hits += 1,
            None => self.misses += 1,
        }

        found
    }

    pub fn insert(&mut self, key: PairKey, miles: f64) {
        self.entries.insert(key, miles);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    /// Drops every entry and hands back the allocation. Returns how many entries were held.
    pub fn clear(&mut self) -> usize {
        let released = self.entries.len();
        self.entries = AHashMap::new();
        released
    }
}

impl Default for DistanceCache {
    fn default() -> Self {
        Self::new()
    }
}
