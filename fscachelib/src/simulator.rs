use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::cache::{BlockCache, DirectMappedCache, GenericCache, GlobalLruCache, SetAssociativeCache};
use crate::config::{CacheConfig, CacheKindConfig, FileSystemKind, SimulationConfig};
use crate::error::{ConfigurationError, SimulationError};
use crate::filesystem::{Ext3, Ext4, FileSystem};
use crate::pattern::{generate_access_pattern, Access, Operation};
use crate::stats::AccessStats;

/// The result of replaying one access sequence through one filesystem model and cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub pattern: String,
    pub cache: String,
    pub filesystem: String,
    pub stats: AccessStats,
    pub capacity: usize,
    /// Blocks resident in the cache once the run finished
    pub resident_blocks: usize,
}

/// Replays `accesses` against a filesystem model
///
/// The counters are not reset first, so several replays can be accumulated into one set of
/// counters. The timing fields are overwritten with this replay's timing
///
/// # Examples
///
/// ```
/// use fscachelib::cache::GlobalLruCache;
/// use fscachelib::filesystem::Ext4;
/// use fscachelib::pattern::Access;
/// use fscachelib::simulator::run_simulation;
/// use fscachelib::stats::AccessStats;
/// let mut cache = GlobalLruCache::new(8).unwrap();
/// let mut fs = Ext4::new(&mut cache, 4096).unwrap();
/// let mut stats = AccessStats::new();
/// run_simulation(&mut fs, &[Access::read(0), Access::read(4096)], &mut stats);
/// assert_eq!((stats.cache_hits, stats.cache_misses, stats.disk_reads), (4, 4, 4));
/// ```
pub fn run_simulation<F: FileSystem + ?Sized>(fs: &mut F, accesses: &[Access], stats: &mut AccessStats) {
    let start = Instant::now();
    for access in accesses {
        match access.operation {
            Operation::Read => fs.read(access.address, stats),
            Operation::Write => fs.write(access.address, stats),
        }
    }
    stats.finish(start.elapsed(), accesses.len());
}

/// Creates a new cache from a cache configuration
pub fn config_to_cache(config: &CacheConfig) -> Result<GenericCache, ConfigurationError> {
    Ok(match (config.kind, config.kind.ways()) {
        (CacheKindConfig::Direct, _) => GenericCache::from(DirectMappedCache::new(config.capacity)?),
        (_, Some(ways)) => GenericCache::from(SetAssociativeCache::new(config.capacity, ways)?),
        (_, None) => GenericCache::from(GlobalLruCache::new(config.capacity)?),
    })
}

/// The simulator runs every configured cache against every configured filesystem model, and
/// collects the counters of each run
///
/// It supports calling simulate multiple times, and will accumulate the time taken to simulate
pub struct Simulator {
    config: SimulationConfig,
    simulation_time: Duration,
}

impl Simulator {

    /// Creates a new simulator for a given configuration
    ///
    /// Every cache configuration is built once up front, so an invalid one is reported here rather
    /// than partway through a simulation
    ///
    /// # Arguments
    ///
    /// * `config`: A simulation configuration, usually resulting from parsing JSON
    ///
    /// returns: Result<Simulator, SimulationError>
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        if config.block_size == 0 {
            return Err(ConfigurationError::ZeroBlockSize.into());
        }
        for cache in &config.caches {
            config_to_cache(cache)?;
        }
        Ok(Self {
            config: config.clone(),
            simulation_time: Duration::new(0, 0),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Generates and simulates every configured access pattern
    pub fn simulate_patterns(&mut self) -> Result<Vec<RunResult>, SimulationError> {
        let mut results = Vec::new();
        for pattern in self.config.patterns.clone() {
            let accesses = generate_access_pattern(self.config.operations, pattern, self.config.seed);
            results.extend(self.simulate(pattern.name(), &accesses)?);
        }
        Ok(results)
    }

    /// Simulates one access sequence against every cache and filesystem pairing
    ///
    /// Each pairing gets its own zeroed counters. Unless `shared_cache` is set each pairing also
    /// gets a fresh cache, otherwise the filesystem models of one cache configuration run one
    /// after the other over the same cache state
    ///
    /// # Arguments
    ///
    /// * `label`: Name of the access sequence, copied into the results
    /// * `accesses`: The accesses to replay
    ///
    /// returns: Result<Vec<RunResult>, SimulationError>
    pub fn simulate(&mut self, label: &str, accesses: &[Access]) -> Result<Vec<RunResult>, SimulationError> {
        let start = Instant::now();
        let mut results = Vec::with_capacity(self.config.caches.len() * self.config.filesystems.len());
        for cache_config in &self.config.caches {
            let mut shared = if self.config.shared_cache {
                Some(config_to_cache(cache_config)?)
            } else {
                None
            };
            for &kind in &self.config.filesystems {
                let mut fresh;
                let cache = match shared.as_mut() {
                    Some(cache) => cache,
                    None => {
                        fresh = config_to_cache(cache_config)?;
                        &mut fresh
                    }
                };
                let mut stats = AccessStats::new();
                self.run(kind, cache, accesses, &mut stats)?;
                debug!(
                    pattern = label,
                    cache = %cache_config.name,
                    filesystem = kind.name(),
                    hits = stats.cache_hits,
                    misses = stats.cache_misses,
                    "run finished"
                );
                results.push(RunResult {
                    pattern: label.to_string(),
                    cache: cache_config.name.clone(),
                    filesystem: kind.name().to_string(),
                    stats,
                    capacity: cache.capacity(),
                    resident_blocks: cache.resident_blocks(),
                });
            }
        }
        let elapsed = start.elapsed();
        info!(pattern = label, accesses = accesses.len(), runs = results.len(), ?elapsed, "simulated access sequence");
        self.simulation_time += elapsed;
        Ok(results)
    }

    /// Gets the wall-clock execution time spent simulating
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    fn run(&self, kind: FileSystemKind, cache: &mut GenericCache, accesses: &[Access], stats: &mut AccessStats) -> Result<(), ConfigurationError> {
        match kind {
            FileSystemKind::Ext3 => {
                let mut fs = Ext3::new(cache, self.config.block_size)?;
                fs.set_journal_mode(self.config.journal_mode);
                run_simulation(&mut fs, accesses, stats);
            }
            FileSystemKind::Ext4 => {
                let mut fs = Ext4::new(cache, self.config.block_size)?;
                fs.set_journal_mode(self.config.journal_mode);
                run_simulation(&mut fs, accesses, stats);
            }
        }
        Ok(())
    }
}
