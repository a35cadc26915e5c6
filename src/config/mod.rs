//! Configuration for chunking behavior.
//!
//! This module provides the types a [`ChunkingStrategy`](crate::ChunkingStrategy)
//! is built from:
//!
//! - [`StrategyConfig`] - Selects static or Rabin-Karp chunking
//! - [`RabinKarpConfig`] - Rolling hash window size and seed
//! - [`ReadConfig`] - How the stream adapters pull bytes from a reader
//!
//! # Example
//!
//! ```
//! use fastchunking::{ChunkingStrategy, RabinKarpConfig, StrategyConfig};
//!
//! let config = RabinKarpConfig::new(48, 0)?;
//! let strategy = ChunkingStrategy::from_config(StrategyConfig::RabinKarp(config))?;
//! assert_eq!(strategy.window_size(), 48);
//! # Ok::<(), fastchunking::ChunkError>(())
//! ```

use crate::error::ChunkError;

/// Default rolling hash window size in bytes.
pub const DEFAULT_WINDOW_SIZE: usize = 48;

/// Default seed for the rolling hash character table.
pub const DEFAULT_SEED: u32 = 0;

/// Default number of bytes the stream adapters request per read (64 KiB).
pub const DEFAULT_READ_SIZE: usize = 64 * 1024;

/// Selects the chunking algorithm a strategy is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyConfig {
    /// Fixed-size chunking. No hash, no window.
    Static,

    /// Rabin-Karp content-defined chunking.
    RabinKarp(RabinKarpConfig),
}

impl StrategyConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ChunkError> {
        match self {
            StrategyConfig::Static => Ok(()),
            StrategyConfig::RabinKarp(config) => config.validate(),
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::RabinKarp(RabinKarpConfig::default())
    }
}

/// Configuration for the Rabin-Karp rolling hash.
///
/// The window size is the number of trailing bytes the hash is sensitive to.
/// The seed selects the per-byte character table, so two strategies with
/// different seeds cut the same content at unrelated positions.
///
/// # Example
///
/// ```
/// use fastchunking::RabinKarpConfig;
///
/// let config = RabinKarpConfig::default().with_window_size(32).with_seed(7);
/// assert_eq!(config.window_size(), 32);
/// assert_eq!(config.seed(), 7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RabinKarpConfig {
    window_size: usize,
    seed: u32,
}

impl RabinKarpConfig {
    /// Creates a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `window_size` is zero.
    pub fn new(window_size: usize, seed: u32) -> Result<Self, ChunkError> {
        if window_size == 0 {
            return Err(ChunkError::invalid("window size must be non-zero"));
        }

        Ok(Self { window_size, seed })
    }

    /// Sets the window size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`RabinKarpConfig::validate`] to check it.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Sets the character table seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the window size.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns the seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), ChunkError> {
        Self::new(self.window_size, self.seed).map(|_| ())
    }
}

impl Default for RabinKarpConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            seed: DEFAULT_SEED,
        }
    }
}

/// Controls how the stream adapters feed a chunker from a reader.
///
/// `prepend_bytes` is the virtual lead-in handed to the chunker together with
/// the first block read from the source; later blocks get none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadConfig {
    read_size: usize,
    prepend_bytes: usize,
}

impl ReadConfig {
    /// Creates a new read configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `read_size` is zero.
    pub fn new(read_size: usize, prepend_bytes: usize) -> Result<Self, ChunkError> {
        if read_size == 0 {
            return Err(ChunkError::invalid("read size must be non-zero"));
        }

        Ok(Self {
            read_size,
            prepend_bytes,
        })
    }

    /// Sets the number of bytes requested per read.
    pub fn with_read_size(mut self, read_size: usize) -> Self {
        self.read_size = read_size;
        self
    }

    /// Sets the virtual lead-in applied before the first block.
    pub fn with_prepend_bytes(mut self, prepend_bytes: usize) -> Self {
        self.prepend_bytes = prepend_bytes;
        self
    }

    /// Returns the number of bytes requested per read.
    pub fn read_size(&self) -> usize {
        self.read_size
    }

    /// Returns the virtual lead-in length.
    pub fn prepend_bytes(&self) -> usize {
        self.prepend_bytes
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), ChunkError> {
        Self::new(self.read_size, self.prepend_bytes).map(|_| ())
    }
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            read_size: DEFAULT_READ_SIZE,
            prepend_bytes: 0,
        }
    }
}

/// Checks a single target chunk size.
pub(crate) fn validate_chunk_size(chunk_size: usize) -> Result<usize, ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::invalid("chunk size must be non-zero"));
    }
    Ok(chunk_size)
}

/// Checks a list of target chunk sizes. Ordering is a caller precondition.
pub(crate) fn validate_chunk_sizes(chunk_sizes: &[usize]) -> Result<(), ChunkError> {
    if chunk_sizes.is_empty() {
        return Err(ChunkError::invalid("at least one chunk size is required"));
    }
    for &size in chunk_sizes {
        validate_chunk_size(size)?;
    }
    Ok(())
}
