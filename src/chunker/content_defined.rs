//! Single-threshold content-defined chunking.

use super::ChunkBoundaries;
use crate::cdc::{RabinKarpHash, RollingHash, threshold_for};
use crate::config::validate_chunk_size;
use crate::error::ChunkError;

/// Cuts wherever the rolling hash drops below `range / chunk_size`.
///
/// Every position is tested, not just every `chunk_size`-th one, and a cut
/// never resets the hash: the window slides continuously over the whole
/// stream. A repeated substring longer than the window is therefore cut at
/// the same relative positions wherever it recurs.
///
/// # Example
///
/// ```
/// use fastchunking::{ChunkBoundaries, ContentDefinedChunker, RabinKarpHash};
///
/// let mut chunker = ContentDefinedChunker::new(RabinKarpHash::new(48, 0)?, 128)?;
/// let data: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
///
/// let whole = chunker.next_chunk_boundaries(&data, 0);
/// assert!(whole.iter().all(|&b| b >= 48 && b <= data.len()));
/// # Ok::<(), fastchunking::ChunkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ContentDefinedChunker<H = RabinKarpHash> {
    hash: H,
    chunk_size: usize,
    threshold: u64,
}

impl<H: RollingHash> ContentDefinedChunker<H> {
    /// Creates a chunker around `hash` targeting `chunk_size` on average.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `chunk_size` is zero.
    pub fn new(hash: H, chunk_size: usize) -> Result<Self, ChunkError> {
        let chunk_size = validate_chunk_size(chunk_size)?;
        let threshold = threshold_for(hash.range(), chunk_size);
        Ok(Self {
            hash,
            chunk_size,
            threshold,
        })
    }

    /// Returns the target average chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the absolute threshold hash values are compared against.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Returns the rolling hash, i.e. the continuation state.
    pub fn engine(&self) -> &H {
        &self.hash
    }
}

impl<H: RollingHash> ChunkBoundaries for ContentDefinedChunker<H> {
    fn next_chunk_boundaries(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<usize> {
        self.hash.consume_zeros(prepend_bytes);

        let mut boundaries = Vec::new();
        for (i, &byte) in buf.iter().enumerate() {
            self.hash.consume(byte);
            if self.hash.is_warm() && u64::from(self.hash.value()) < self.threshold {
                boundaries.push(i + 1);
            }
        }
        boundaries
    }

    fn reset(&mut self) {
        self.hash.reset();
    }
}
