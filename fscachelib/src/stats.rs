use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Counters accumulated over one simulation run
///
/// The counters are owned by the caller and passed into every cache and filesystem operation. They
/// only ever grow during a run, so they must be reset before the struct is reused for an
/// independent simulation, otherwise results accumulate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub disk_reads: u64,
    pub disk_writes: u64,
    pub journal_ops: u64,
    /// Wall-clock time of the run in milliseconds
    pub total_latency: f64,
    /// Mean time per replayed access in milliseconds
    pub avg_access_time: f64,
}

impl AccessStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes every counter, including the timing fields
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records the timing of a finished run
    ///
    /// An empty run leaves `avg_access_time` at zero rather than dividing by zero
    ///
    /// # Arguments
    ///
    /// * `elapsed`: Wall-clock time spent replaying the accesses
    /// * `operations`: Number of accesses replayed
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use fscachelib::stats::AccessStats;
    /// let mut stats = AccessStats::new();
    /// stats.finish(Duration::from_millis(10), 0);
    /// assert_eq!(stats.total_latency, 10.0);
    /// assert_eq!(stats.avg_access_time, 0.0);
    /// ```
    pub fn finish(&mut self, elapsed: Duration, operations: usize) {
        self.total_latency = elapsed.as_nanos() as f64 / 1e6;
        self.avg_access_time = if operations == 0 {
            0.0
        } else {
            self.total_latency / operations as f64
        };
    }

    pub fn total_accesses(&self) -> u64 {
        self.cache_hits + self.cache_misses
    }

    /// Fraction of cache accesses which hit, zero if the cache was never accessed
    pub fn hit_ratio(&self) -> f64 {
        match self.total_accesses() {
            0 => 0.0,
            total => self.cache_hits as f64 / total as f64,
        }
    }
}
