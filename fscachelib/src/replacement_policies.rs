use std::collections::HashMap;
use crate::block::BlockId;

const NIL: usize = usize::MAX;

/// A resident block and its write-back state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub block: BlockId,
    pub dirty: bool,
}

struct Node {
    entry: CacheEntry,
    prev: usize,
    next: usize,
}

/// Least Recently Used replacement state for one group of cache slots
///
/// Recency is kept as a doubly linked list whose nodes live in an arena and link to each other by
/// index, with a map from block to arena index. Every operation is O(1): a hit is unlinked and
/// relinked at the head, and the victim is always the tail
///
/// Arena slots freed by eviction are recycled, so the arena never grows beyond the largest number
/// of blocks resident at once
pub struct LeastRecentlyUsed {
    nodes: Vec<Node>,
    free: Vec<usize>,
    index: HashMap<BlockId, usize>,
    // Most recently used
    head: usize,
    // Least recently used, the next victim
    tail: usize,
}

impl LeastRecentlyUsed {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity),
            head: NIL,
            tail: NIL,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, block: BlockId) -> bool {
        self.index.contains_key(&block)
    }

    /// Moves `block` to the most recently used position, returning false if it isn't resident
    pub fn touch(&mut self, block: BlockId) -> bool {
        match self.index.get(&block) {
            Some(&idx) => {
                self.unlink(idx);
                self.link_front(idx);
                true
            }
            None => false,
        }
    }

    /// Adds `block` as the most recently used entry with a clean dirty flag
    ///
    /// A block which is already resident is moved to the front and cleaned rather than duplicated.
    /// Capacity is the caller's concern, this never evicts
    pub fn push_front(&mut self, block: BlockId) {
        if let Some(&idx) = self.index.get(&block) {
            self.nodes[idx].entry.dirty = false;
            self.unlink(idx);
            self.link_front(idx);
            return;
        }
        let node = Node {
            entry: CacheEntry { block, dirty: false },
            prev: NIL,
            next: NIL,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.index.insert(block, idx);
        self.link_front(idx);
    }

    /// Removes and returns the least recently used entry
    pub fn pop_back(&mut self) -> Option<CacheEntry> {
        if self.tail == NIL {
            return None;
        }
        let idx = self.tail;
        self.unlink(idx);
        self.free.push(idx);
        let entry = self.nodes[idx].entry;
        self.index.remove(&entry.block);
        Some(entry)
    }

    /// Sets the dirty flag if `block` is resident, without changing its recency
    pub fn mark_dirty(&mut self, block: BlockId) {
        if let Some(&idx) = self.index.get(&block) {
            self.nodes[idx].entry.dirty = true;
        }
    }

    pub fn is_dirty(&self, block: BlockId) -> bool {
        self.index.get(&block).map_or(false, |&idx| self.nodes[idx].entry.dirty)
    }

    /// The block that would be evicted next
    pub fn least_recent(&self) -> Option<BlockId> {
        (self.tail != NIL).then(|| self.nodes[self.tail].entry.block)
    }

    /// Resident blocks from most to least recently used
    pub fn iter(&self) -> impl Iterator<Item = BlockId> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            if cursor == NIL {
                return None;
            }
            let node = &self.nodes[cursor];
            cursor = node.next;
            Some(node.entry.block)
        })
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }

    fn link_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }
}
