//! # FsCacheLib
//!
//! FsCacheLib is a library for comparing block cache replacement policies under filesystem access
//! patterns
//!
//! It provides three block caches (direct mapped, set associative with per-set LRU, and fully
//! associative with a global LRU) and two filesystem translation models (an ext3-like model with
//! journal and metadata overhead, and an ext4-like model with extent reads and delayed
//! allocation), plus a simulator which replays access sequences through every pairing
//!
//! Nothing is actually stored or read from disk, only block numbers are tracked and disk traffic
//! is counted

/// The block number type and address translation helpers
pub mod block;

/// Contains the cache trait, the three cache implementations, and a utility enum over them
pub mod cache;

/// Contains definitions for the JSON configuration format
pub mod config;

/// Configuration and simulation errors
pub mod error;

/// Contains the ext3 and ext4 translation models
pub mod filesystem;

/// Loading trace files from disk
pub mod io;

/// Access sequences and their generators
pub mod pattern;

/// The O(1) LRU state shared by the associative caches
pub mod replacement_policies;

/// Human readable output for simulation results
pub mod report;

/// Contains the simulator used to replay access sequences against every configured pairing
pub mod simulator;

/// Counters shared by the caches and filesystem models during a run
pub mod stats;

/// Parser for text access traces
pub mod trace;

#[cfg(test)]
mod test;
