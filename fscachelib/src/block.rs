/// Identifies a fixed-size storage unit
pub type BlockId = u64;

/// Number of blocks read together by an extent access
pub const EXTENT_BLOCKS: u64 = 4;

/// Converts a byte address into the block holding it
///
/// # Examples
///
/// ```
/// use fscachelib::block::block_id;
/// assert_eq!(block_id(8191, 4096), 1);
/// assert_eq!(block_id(8192, 4096), 2);
/// ```
#[inline(always)]
pub fn block_id(address: u64, block_size: u64) -> BlockId {
    address / block_size
}

/// First block of the 4-block extent containing `block`
///
/// # Examples
///
/// ```
/// use fscachelib::block::extent_base;
/// assert_eq!(extent_base(10), 8);
/// assert_eq!(extent_base(12), 12);
/// ```
#[inline(always)]
pub fn extent_base(block: BlockId) -> BlockId {
    block & !(EXTENT_BLOCKS - 1)
}
