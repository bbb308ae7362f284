use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Stride between sequential accesses, one 4K block
pub const SEQUENTIAL_STRIDE: u64 = 4096;
/// Upper bound (inclusive) of random addresses
pub const RANDOM_ADDRESS_LIMIT: u64 = 1 << 24;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Read,
    Write,
}

/// One replayed filesystem operation
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Access {
    pub operation: Operation,
    pub address: u64,
}

impl Access {
    pub fn read(address: u64) -> Self {
        Self { operation: Operation::Read, address }
    }

    pub fn write(address: u64) -> Self {
        Self { operation: Operation::Write, address }
    }

    /// Picks the operation from the address itself, one address in five is a write
    ///
    /// # Examples
    ///
    /// ```
    /// use fscachelib::pattern::{Access, Operation};
    /// assert_eq!(Access::from_address(4096 * 5).operation, Operation::Write);
    /// assert_eq!(Access::from_address(4096).operation, Operation::Read);
    /// ```
    pub fn from_address(address: u64) -> Self {
        if address % 5 == 0 {
            Self::write(address)
        } else {
            Self::read(address)
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessPattern {
    #[serde(alias = "sequential")]
    Sequential,
    #[serde(alias = "random")]
    Random,
}

impl AccessPattern {
    pub fn name(&self) -> &'static str {
        match self {
            AccessPattern::Sequential => "sequential",
            AccessPattern::Random => "random",
        }
    }
}

/// Generates `num_ops` accesses following `pattern`
///
/// Sequential patterns walk consecutive 4K blocks from address 0. Random patterns draw addresses
/// uniformly from `[0, 1 << 24]` with a generator seeded by `seed`, so the same seed always gives
/// the same sequence
pub fn generate_access_pattern(num_ops: usize, pattern: AccessPattern, seed: u64) -> Vec<Access> {
    match pattern {
        AccessPattern::Sequential => (0..num_ops as u64)
            .map(|i| Access::from_address(i * SEQUENTIAL_STRIDE))
            .collect(),
        AccessPattern::Random => {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..num_ops)
                .map(|_| Access::from_address(rng.gen_range(0..=RANDOM_ADDRESS_LIMIT)))
                .collect()
        }
    }
}
