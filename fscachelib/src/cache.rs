use tracing::trace;
use crate::block::BlockId;
use crate::error::ConfigurationError;
use crate::replacement_policies::{CacheEntry, LeastRecentlyUsed};
use crate::stats::AccessStats;

/// A generic trait for block caches
///
/// The filesystem models only talk to caches through this trait, and are generic over it, so the
/// concrete cache is known at compile time and the calls can be inlined
///
/// Looking a block up and loading it are separate steps: `access` only reports whether the block
/// is resident, and it is the caller's decision to `insert` it after a miss
pub trait BlockCache {

    /// Looks up a block, returning true on a cache hit, and false otherwise
    ///
    /// A hit increments `cache_hits` and refreshes any recency state, a miss increments
    /// `cache_misses` and leaves the cache untouched
    ///
    /// # Arguments
    ///
    /// * `block`: The block to look up
    /// * `stats`: The counters for the current run
    ///
    /// returns: bool
    fn access(&mut self, block: BlockId, stats: &mut AccessStats) -> bool;

    /// Loads a block into the cache as clean, evicting according to the placement policy if the
    /// slot or set it maps to is full
    fn insert(&mut self, block: BlockId);

    /// Flags a resident block as modified. Does nothing if the block isn't resident
    fn mark_dirty(&mut self, block: BlockId);

    /// Whether the block is resident. Doesn't touch counters or recency
    fn contains(&self, block: BlockId) -> bool;

    /// Whether the block is resident and has been modified since it was loaded
    fn is_dirty(&self, block: BlockId) -> bool;

    /// Total number of block slots
    fn capacity(&self) -> usize;

    /// Number of slots currently holding a block. Useful for analysing cache utilisation
    fn resident_blocks(&self) -> usize;
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    block: BlockId,
    dirty: bool,
    valid: bool,
}

impl Slot {
    const EMPTY: Slot = Slot { block: 0, dirty: false, valid: false };

    fn holds(&self, block: BlockId) -> bool {
        self.valid && self.block == block
    }
}

/// Direct mapped cache, each block can only live in slot `block % capacity`
///
/// Eviction is purely positional, whatever occupied the slot is overwritten regardless of how
/// recently it was used
pub struct DirectMappedCache {
    slots: Vec<Slot>,
}

impl DirectMappedCache {
    pub fn new(capacity: usize) -> Result<Self, ConfigurationError> {
        if capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        Ok(Self {
            slots: vec![Slot::EMPTY; capacity],
        })
    }

    #[inline(always)]
    fn slot_index(&self, block: BlockId) -> usize {
        (block % self.slots.len() as u64) as usize
    }
}

impl BlockCache for DirectMappedCache {
    fn access(&mut self, block: BlockId, stats: &mut AccessStats) -> bool {
        if self.slots[self.slot_index(block)].holds(block) {
            stats.cache_hits += 1;
            true
        } else {
            stats.cache_misses += 1;
            false
        }
    }

    fn insert(&mut self, block: BlockId) {
        let index = self.slot_index(block);
        let slot = &mut self.slots[index];
        if slot.valid && slot.block != block {
            trace!(victim = slot.block, dirty = slot.dirty, slot = index, "direct mapped eviction");
        }
        *slot = Slot { block, dirty: false, valid: true };
    }

    fn mark_dirty(&mut self, block: BlockId) {
        let index = self.slot_index(block);
        let slot = &mut self.slots[index];
        if slot.holds(block) {
            slot.dirty = true;
        }
    }

    fn contains(&self, block: BlockId) -> bool {
        self.slots[self.slot_index(block)].holds(block)
    }

    fn is_dirty(&self, block: BlockId) -> bool {
        let slot = &self.slots[self.slot_index(block)];
        slot.holds(block) && slot.dirty
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn resident_blocks(&self) -> usize {
        self.slots.iter().filter(|s| s.valid).count()
    }
}

/// Set associative cache with LRU replacement inside each set
///
/// The `capacity` slots are split into `capacity / ways` sets, a block maps to set
/// `block % num_sets` and each set keeps its own recency order
pub struct SetAssociativeCache {
    ways: usize,
    sets: Vec<LeastRecentlyUsed>,
}

impl SetAssociativeCache {

    /// Creates a new set associative cache
    ///
    /// Configurations which would leave slots unused are rejected rather than rounded down
    ///
    /// # Arguments
    ///
    /// * `capacity`: Total number of block slots
    /// * `ways`: Slots per set, must divide `capacity`
    ///
    /// returns: Result<SetAssociativeCache, ConfigurationError>
    ///
    /// # Examples
    ///
    /// ```
    /// use fscachelib::cache::SetAssociativeCache;
    /// use fscachelib::error::ConfigurationError;
    /// assert_eq!(SetAssociativeCache::new(512, 4).unwrap().num_sets(), 128);
    /// assert_eq!(SetAssociativeCache::new(10, 4).err(), Some(ConfigurationError::UnevenSets { capacity: 10, ways: 4 }));
    /// ```
    pub fn new(capacity: usize, ways: usize) -> Result<Self, ConfigurationError> {
        if capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        if ways == 0 {
            return Err(ConfigurationError::ZeroWays);
        }
        if capacity % ways != 0 {
            return Err(ConfigurationError::UnevenSets { capacity, ways });
        }
        let num_sets = capacity / ways;
        Ok(Self {
            ways,
            sets: (0..num_sets).map(|_| LeastRecentlyUsed::with_capacity(ways)).collect(),
        })
    }

    pub fn ways(&self) -> usize {
        self.ways
    }

    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    #[inline(always)]
    fn set_index(&self, block: BlockId) -> usize {
        (block % self.sets.len() as u64) as usize
    }
}

impl BlockCache for SetAssociativeCache {
    fn access(&mut self, block: BlockId, stats: &mut AccessStats) -> bool {
        let set = self.set_index(block);
        if self.sets[set].touch(block) {
            stats.cache_hits += 1;
            true
        } else {
            stats.cache_misses += 1;
            false
        }
    }

    fn insert(&mut self, block: BlockId) {
        let index = self.set_index(block);
        let set = &mut self.sets[index];
        if !set.contains(block) && set.len() >= self.ways {
            if let Some(CacheEntry { block: victim, dirty }) = set.pop_back() {
                trace!(victim, dirty, set = index, "set associative eviction");
            }
        }
        set.push_front(block);
    }

    fn mark_dirty(&mut self, block: BlockId) {
        let set = self.set_index(block);
        self.sets[set].mark_dirty(block);
    }

    fn contains(&self, block: BlockId) -> bool {
        self.sets[self.set_index(block)].contains(block)
    }

    fn is_dirty(&self, block: BlockId) -> bool {
        self.sets[self.set_index(block)].is_dirty(block)
    }

    fn capacity(&self) -> usize {
        self.ways * self.sets.len()
    }

    fn resident_blocks(&self) -> usize {
        self.sets.iter().map(LeastRecentlyUsed::len).sum()
    }
}

/// Fully associative cache with a single global LRU order
pub struct GlobalLruCache {
    capacity: usize,
    lru: LeastRecentlyUsed,
}

impl GlobalLruCache {
    pub fn new(capacity: usize) -> Result<Self, ConfigurationError> {
        if capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            lru: LeastRecentlyUsed::with_capacity(capacity),
        })
    }

    /// Resident blocks from most to least recently used
    pub fn recency_order(&self) -> Vec<BlockId> {
        self.lru.iter().collect()
    }
}

impl BlockCache for GlobalLruCache {
    fn access(&mut self, block: BlockId, stats: &mut AccessStats) -> bool {
        if self.lru.touch(block) {
            stats.cache_hits += 1;
            true
        } else {
            stats.cache_misses += 1;
            false
        }
    }

    fn insert(&mut self, block: BlockId) {
        if !self.lru.contains(block) && self.lru.len() >= self.capacity {
            if let Some(CacheEntry { block: victim, dirty }) = self.lru.pop_back() {
                trace!(victim, dirty, "global lru eviction");
            }
        }
        self.lru.push_front(block);
    }

    fn mark_dirty(&mut self, block: BlockId) {
        self.lru.mark_dirty(block);
    }

    fn contains(&self, block: BlockId) -> bool {
        self.lru.contains(block)
    }

    fn is_dirty(&self, block: BlockId) -> bool {
        self.lru.is_dirty(block)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn resident_blocks(&self) -> usize {
        self.lru.len()
    }
}

/// Enum for the 3 types of cache provided by the library
///
/// Each simulated access goes through several cache calls, so rather than boxing the cache as a
/// trait object we branch explicitly on every implementation, which lets the compiler see the
/// concrete types and inline them
pub enum GenericCache {
    DirectMapped(DirectMappedCache),
    SetAssociative(SetAssociativeCache),
    GlobalLru(GlobalLruCache),
}

impl From<DirectMappedCache> for GenericCache {
    fn from(value: DirectMappedCache) -> Self {
        Self::DirectMapped(value)
    }
}

impl From<SetAssociativeCache> for GenericCache {
    fn from(value: SetAssociativeCache) -> Self {
        Self::SetAssociative(value)
    }
}

impl From<GlobalLruCache> for GenericCache {
    fn from(value: GlobalLruCache) -> Self {
        Self::GlobalLru(value)
    }
}

impl BlockCache for GenericCache {
    fn access(&mut self, block: BlockId, stats: &mut AccessStats) -> bool {
        match self {
            GenericCache::DirectMapped(c) => c.access(block, stats),
            GenericCache::SetAssociative(c) => c.access(block, stats),
            GenericCache::GlobalLru(c) => c.access(block, stats),
        }
    }

    fn insert(&mut self, block: BlockId) {
        match self {
            GenericCache::DirectMapped(c) => c.insert(block),
            GenericCache::SetAssociative(c) => c.insert(block),
            GenericCache::GlobalLru(c) => c.insert(block),
        }
    }

    fn mark_dirty(&mut self, block: BlockId) {
        match self {
            GenericCache::DirectMapped(c) => c.mark_dirty(block),
            GenericCache::SetAssociative(c) => c.mark_dirty(block),
            GenericCache::GlobalLru(c) => c.mark_dirty(block),
        }
    }

    fn contains(&self, block: BlockId) -> bool {
        match self {
            GenericCache::DirectMapped(c) => c.contains(block),
            GenericCache::SetAssociative(c) => c.contains(block),
            GenericCache::GlobalLru(c) => c.contains(block),
        }
    }

    fn is_dirty(&self, block: BlockId) -> bool {
        match self {
            GenericCache::DirectMapped(c) => c.is_dirty(block),
            GenericCache::SetAssociative(c) => c.is_dirty(block),
            GenericCache::GlobalLru(c) => c.is_dirty(block),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            GenericCache::DirectMapped(c) => c.capacity(),
            GenericCache::SetAssociative(c) => c.capacity(),
            GenericCache::GlobalLru(c) => c.capacity(),
        }
    }

    fn resident_blocks(&self) -> usize {
        match self {
            GenericCache::DirectMapped(c) => c.resident_blocks(),
            GenericCache::SetAssociative(c) => c.resident_blocks(),
            GenericCache::GlobalLru(c) => c.resident_blocks(),
        }
    }
}
