use serde::{Deserialize, Serialize};
use crate::block::{block_id, extent_base, BlockId, EXTENT_BLOCKS};
use crate::cache::BlockCache;
use crate::error::ConfigurationError;
use crate::stats::AccessStats;

/// Block holding the ext3 journal
pub const JOURNAL_BLOCK: BlockId = 0;
/// Block holding the ext3 inode/metadata touched on every operation
pub const METADATA_BLOCK: BlockId = 1;

/// How much of a write is journaled before it reaches its block
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JournalMode {
    #[serde(alias = "none")]
    NoJournaling,
    #[default]
    #[serde(alias = "metadata")]
    MetadataJournaling,
    #[serde(alias = "full")]
    FullJournaling,
}

/// A filesystem address translation model
///
/// Implementations turn byte addresses into one or more block accesses against the cache they
/// borrow, recording the cost of each step in the caller's counters
pub trait FileSystem {
    fn read(&mut self, address: u64, stats: &mut AccessStats);

    fn write(&mut self, address: u64, stats: &mut AccessStats);

    /// Changes the journaling mode for subsequent writes. Models which always journal ignore it
    fn set_journal_mode(&mut self, mode: JournalMode);

    fn journal_mode(&self) -> JournalMode;

    /// Short name used in reports, e.g. "ext3"
    fn name(&self) -> &'static str;
}

/// Looks a block up and loads it after a miss, returning whether it hit
///
/// `count_read` is false for loads which don't go to disk immediately
#[inline(always)]
fn fetch<C: BlockCache + ?Sized>(cache: &mut C, block: BlockId, stats: &mut AccessStats, count_read: bool) -> bool {
    if cache.access(block, stats) {
        return true;
    }
    cache.insert(block);
    if count_read {
        stats.disk_reads += 1;
    }
    false
}

fn check_block_size(block_size: u64) -> Result<u64, ConfigurationError> {
    if block_size == 0 {
        Err(ConfigurationError::ZeroBlockSize)
    } else {
        Ok(block_size)
    }
}

/// ext3-like model with a single level of translation
///
/// Every operation first touches the metadata block, and journaled writes also touch the journal
/// block, which puts extra pressure on the cache compared to the data accesses alone
pub struct Ext3<'a, C: BlockCache + ?Sized> {
    cache: &'a mut C,
    block_size: u64,
    journal_mode: JournalMode,
}

impl<'a, C: BlockCache + ?Sized> Ext3<'a, C> {
    /// Creates an ext3 model over a borrowed cache, journaling metadata by default
    pub fn new(cache: &'a mut C, block_size: u64) -> Result<Self, ConfigurationError> {
        Ok(Self {
            cache,
            block_size: check_block_size(block_size)?,
            journal_mode: JournalMode::default(),
        })
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    fn journal_operation(&mut self, stats: &mut AccessStats) {
        stats.journal_ops += 1;
        fetch(&mut *self.cache, JOURNAL_BLOCK, stats, true);
    }
}

impl<'a, C: BlockCache + ?Sized> FileSystem for Ext3<'a, C> {
    fn read(&mut self, address: u64, stats: &mut AccessStats) {
        let block = block_id(address, self.block_size);
        fetch(&mut *self.cache, METADATA_BLOCK, stats, true);
        fetch(&mut *self.cache, block, stats, true);
    }

    fn write(&mut self, address: u64, stats: &mut AccessStats) {
        let block = block_id(address, self.block_size);
        if self.journal_mode != JournalMode::NoJournaling {
            self.journal_operation(stats);
        }
        fetch(&mut *self.cache, METADATA_BLOCK, stats, true);
        fetch(&mut *self.cache, block, stats, true);
        self.cache.mark_dirty(block);
        stats.disk_writes += 1;
    }

    fn set_journal_mode(&mut self, mode: JournalMode) {
        self.journal_mode = mode;
    }

    fn journal_mode(&self) -> JournalMode {
        self.journal_mode
    }

    fn name(&self) -> &'static str {
        "ext3"
    }
}

/// ext4-like model with extent based reads and delayed allocation
///
/// Reads load the whole 4-block extent around the target. With delayed allocation, writes only
/// dirty the target block in the cache and defer both the read and the write to disk
pub struct Ext4<'a, C: BlockCache + ?Sized> {
    cache: &'a mut C,
    block_size: u64,
    delayed_allocation: bool,
}

impl<'a, C: BlockCache + ?Sized> Ext4<'a, C> {
    /// Creates an ext4 model over a borrowed cache, with delayed allocation enabled
    pub fn new(cache: &'a mut C, block_size: u64) -> Result<Self, ConfigurationError> {
        Ok(Self {
            cache,
            block_size: check_block_size(block_size)?,
            delayed_allocation: true,
        })
    }

    /// Enables or disables delayed allocation. When disabled, writes read the whole extent and are
    /// written to disk immediately
    pub fn with_delayed_allocation(mut self, enabled: bool) -> Self {
        self.delayed_allocation = enabled;
        self
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn delayed_allocation(&self) -> bool {
        self.delayed_allocation
    }

    fn extent_access(&mut self, address: u64, stats: &mut AccessStats) {
        let base = extent_base(block_id(address, self.block_size));
        // Offset from the base, the top extent ends exactly at u64::MAX
        for block in (0..EXTENT_BLOCKS).map(|offset| base + offset) {
            fetch(&mut *self.cache, block, stats, true);
        }
    }
}

impl<'a, C: BlockCache + ?Sized> FileSystem for Ext4<'a, C> {
    fn read(&mut self, address: u64, stats: &mut AccessStats) {
        self.extent_access(address, stats);
    }

    fn write(&mut self, address: u64, stats: &mut AccessStats) {
        if self.delayed_allocation {
            let block = block_id(address, self.block_size);
            fetch(&mut *self.cache, block, stats, false);
            self.cache.mark_dirty(block);
        } else {
            self.extent_access(address, stats);
            stats.disk_writes += 1;
        }
    }

    // Metadata checksumming is unconditional in this model
    fn set_journal_mode(&mut self, _mode: JournalMode) {}

    fn journal_mode(&self) -> JournalMode {
        JournalMode::MetadataJournaling
    }

    fn name(&self) -> &'static str {
        "ext4"
    }
}
