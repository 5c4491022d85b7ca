/// Default cache capacity; a prime spreads the modulo-reduced keys evenly
pub const DEFAULT_CACHE_CAPACITY: usize = 8_388_593;

#[derive(Copy, Clone)]
struct Entry {
    // full position key, kept to detect index collisions
    key: u64,
    value: i8,
}

/// Fixed-capacity score cache indexed by `key % capacity`
///
/// One slot per index, last writer wins. A stored value is only returned
/// when the slot's full key matches, so a collision degrades to a miss and
/// never to a wrong score. The value 0 marks an empty slot; callers store
/// scores offset into a non-zero range.
#[derive(Clone)]
pub struct TranspositionCache {
    entries: Vec<Entry>,
}

impl TranspositionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![Entry { key: 0, value: 0 }; capacity],
        }
    }

    /// Stores a value, overwriting whatever occupied the slot
    pub fn put(&mut self, key: u64, value: i8) {
        let index = key as usize % self.entries.len();
        self.entries[index] = Entry { key, value };
    }

    /// Returns the stored value, or 0 on an empty slot or key mismatch
    pub fn get(&self, key: u64) -> i8 {
        let entry = self.entries[key as usize % self.entries.len()];
        if entry.key == key {
            entry.value
        } else {
            0
        }
    }

    /// Empties every slot
    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = Entry { key: 0, value: 0 };
        }
    }
}

impl Default for TranspositionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
