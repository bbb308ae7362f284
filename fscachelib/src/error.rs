use thiserror::Error;

/// Errors raised while building a cache or filesystem model
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("cache capacity must be at least one block")]
    ZeroCapacity,
    #[error("a set associative cache needs at least one way")]
    ZeroWays,
    #[error("cache capacity {capacity} is not divisible into sets of {ways} ways")]
    UnevenSets { capacity: usize, ways: usize },
    #[error("block size must be non-zero")]
    ZeroBlockSize,
}

/// Errors raised by the simulator when loading inputs or running a configuration
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("couldn't parse the configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed trace line {line}: {content:?}")]
    Trace { line: usize, content: String },
}
