use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use serde::Deserialize;
use crate::error::SimulationError;
use crate::filesystem::JournalMode;
use crate::pattern::AccessPattern;

/// A full simulation configuration, every field has a default so `{}` is a valid input
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Bytes per block
    pub block_size: u64,
    /// Accesses generated per pattern
    pub operations: usize,
    /// Seed for the random access pattern
    pub seed: u64,
    /// Journaling mode applied to every filesystem model before a run
    pub journal_mode: JournalMode,
    /// Run every filesystem model against the same cache instead of a fresh one each
    pub shared_cache: bool,
    pub filesystems: Vec<FileSystemKind>,
    pub patterns: Vec<AccessPattern>,
    pub caches: Vec<CacheConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            block_size: 4096,
            operations: 10_000,
            seed: 42,
            journal_mode: JournalMode::default(),
            shared_cache: false,
            filesystems: vec![FileSystemKind::Ext3, FileSystemKind::Ext4],
            patterns: vec![AccessPattern::Sequential, AccessPattern::Random],
            caches: vec![
                CacheConfig { name: "direct".to_string(), capacity: 512, kind: CacheKindConfig::Direct },
                CacheConfig { name: "4way".to_string(), capacity: 512, kind: CacheKindConfig::FourWay },
            ],
        }
    }
}

impl SimulationConfig {
    /// Loads a configuration from a JSON file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// A configuration for a single cache
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub name: String,
    /// Number of block slots
    pub capacity: usize,
    pub kind: CacheKindConfig,
}

/// The kind of cache - direct, full, 2way, 4way, 8way, or an arbitrary number of ways
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum CacheKindConfig {
    #[serde(alias = "direct")]
    Direct,
    #[serde(alias = "full")]
    Full,
    #[serde(alias = "2way")]
    TwoWay,
    #[serde(alias = "4way")]
    FourWay,
    #[serde(alias = "8way")]
    EightWay,
    #[serde(alias = "ways")]
    Ways(usize),
}

impl CacheKindConfig {
    /// Slots per set, `None` for caches which aren't set associative
    pub fn ways(&self) -> Option<usize> {
        match self {
            CacheKindConfig::Direct | CacheKindConfig::Full => None,
            CacheKindConfig::TwoWay => Some(2),
            CacheKindConfig::FourWay => Some(4),
            CacheKindConfig::EightWay => Some(8),
            CacheKindConfig::Ways(ways) => Some(*ways),
        }
    }
}

/// The filesystem translation model - ext3 or ext4
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum FileSystemKind {
    #[serde(alias = "ext3")]
    Ext3,
    #[serde(alias = "ext4")]
    Ext4,
}

impl FileSystemKind {
    pub fn name(&self) -> &'static str {
        match self {
            FileSystemKind::Ext3 => "ext3",
            FileSystemKind::Ext4 => "ext4",
        }
    }
}
