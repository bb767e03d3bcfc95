use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DedupError, Result};

/// Fixed capacity of every container, in bytes.
pub const CONTAINER_CAPACITY: usize = 1_048_576;

/// Environment variable consulted for the store root when `--repo` is absent.
pub const STORE_ROOT_ENV: &str = "DDUP_REPO";

/// Parameters of the rolling-hash chunker.
///
/// All fields are 32-bit signed integers because the boundary algorithm is
/// defined over wrapping `i32` arithmetic. `modulus` must be a power of two for
/// the boundary test to mean "divisible by modulus"; this is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerParams {
    /// Window size, and the smallest chunk a content boundary can produce.
    pub min_chunk: i32,
    /// Boundary modulus `q`; controls the average chunk size.
    pub modulus: i32,
    /// Length at which a boundary is forced.
    pub max_chunk: i32,
    /// Rolling hash multiplier `d`.
    pub multiplier: i32,
}

impl ChunkerParams {
    /// Build and validate a parameter set.
    pub fn new(min_chunk: i32, modulus: i32, max_chunk: i32, multiplier: i32) -> Result<Self> {
        let params = Self {
            min_chunk,
            modulus,
            max_chunk,
            multiplier,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_chunk <= 0 {
            return Err(DedupError::Config(
                "min_chunk must be larger than 0".into(),
            ));
        }
        if self.multiplier <= 0 {
            return Err(DedupError::Config("multiplier must be larger than 0".into()));
        }
        if self.modulus <= 0 {
            return Err(DedupError::Config("modulus must be larger than 0".into()));
        }
        if self.max_chunk <= 0 {
            return Err(DedupError::Config(
                "max_chunk must be larger than 0".into(),
            ));
        }
        if self.max_chunk < self.min_chunk {
            return Err(DedupError::Config(
                "max_chunk cannot be smaller than min_chunk".into(),
            ));
        }
        let largest = self.largest_chunk_len();
        if largest > CONTAINER_CAPACITY as u64 {
            return Err(DedupError::Config(format!(
                "largest possible chunk ({largest} bytes) exceeds the container capacity of {CONTAINER_CAPACITY} bytes"
            )));
        }
        Ok(())
    }

    /// Upper bound on the length of any chunk these parameters can emit.
    ///
    /// A forced cut yields exactly `max_chunk` bytes; a content-defined cut
    /// (or the trailing chunk) can run to `max_chunk + min_chunk - 2`.
    pub fn largest_chunk_len(&self) -> u64 {
        let max = self.max_chunk.max(0) as u64;
        let min = self.min_chunk.max(0) as u64;
        max.max((max + min).saturating_sub(2))
    }

    pub fn min_chunk_len(&self) -> usize {
        self.min_chunk as usize
    }

    pub fn max_chunk_len(&self) -> usize {
        self.max_chunk as usize
    }
}

/// Location of a store on local disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub root: PathBuf,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
