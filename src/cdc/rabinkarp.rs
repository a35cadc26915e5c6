//! Rabin-Karp rolling hash.
//!
//! The hash of a window `b_0 .. b_{W-1}` is the polynomial
//!
//! ```text
//! h = T[b_0]·B^(W-1) + T[b_1]·B^(W-2) + ... + T[b_{W-1}]   (mod 2^29)
//! ```
//!
//! where `T` is a seeded [`CharacterTable`]. Sliding the window by one byte is
//! O(1): multiply by `B`, add the incoming word, subtract the outgoing word
//! times `B^W`. All arithmetic wraps in `u32` and is masked to 29 bits, which
//! is exact because `2^29` divides `2^32`.
//!
//! Until `W` bytes have been consumed the engine only accumulates; a chunker
//! must not cut before [`RabinKarpHash::is_warm`] returns true.

use std::sync::Arc;

use super::RollingHash;
use super::table::CharacterTable;
use crate::error::ChunkError;

/// Polynomial base.
pub const BASE: u32 = 37;

/// Width of hash values in bits.
pub const HASH_BITS: u32 = 29;

/// Mask selecting the low [`HASH_BITS`] bits.
pub const HASH_MASK: u32 = (1 << HASH_BITS) - 1;

/// Number of distinct hash values.
pub const HASH_RANGE: u64 = 1 << HASH_BITS;

/// Rabin-Karp hash over the last `window_size` consumed bytes.
///
/// # Example
///
/// ```
/// use fastchunking::{RabinKarpHash, RollingHash};
///
/// let mut hash = RabinKarpHash::new(4, 0)?;
/// for &byte in b"abcd" {
///     hash.consume(byte);
/// }
/// assert!(hash.is_warm());
///
/// // The value only depends on the last four bytes.
/// let mut other = RabinKarpHash::new(4, 0)?;
/// for &byte in b"xyzabcd" {
///     other.consume(byte);
/// }
/// assert_eq!(hash.value(), other.value());
/// # Ok::<(), fastchunking::ChunkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RabinKarpHash {
    table: Arc<CharacterTable>,

    /// Current hash value, always `<= HASH_MASK`.
    hash: u32,

    /// Ring buffer holding the last `window.len()` consumed bytes.
    window: Box<[u8]>,

    /// Slot the next byte is written to; once warm, the slot of the oldest byte.
    head: usize,

    /// Number of valid bytes in `window`, saturating at `window.len()`.
    filled: usize,

    /// `BASE^window_size mod 2^29`.
    base_pow_window: u32,
}

impl RabinKarpHash {
    /// Creates a hash with a table derived from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `window_size` is zero.
    pub fn new(window_size: usize, seed: u32) -> Result<Self, ChunkError> {
        Self::with_table(window_size, Arc::new(CharacterTable::from_seed(seed)))
    }

    /// Creates a hash sharing an existing character table.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `window_size` is zero.
    pub fn with_table(window_size: usize, table: Arc<CharacterTable>) -> Result<Self, ChunkError> {
        if window_size == 0 {
            return Err(ChunkError::invalid("window size must be non-zero"));
        }

        let base_pow_window =
            (0..window_size).fold(1u32, |acc, _| acc.wrapping_mul(BASE) & HASH_MASK);

        Ok(Self {
            table,
            hash: 0,
            window: vec![0u8; window_size].into_boxed_slice(),
            head: 0,
            filled: 0,
            base_pow_window,
        })
    }

    /// Returns the character table this hash is built on.
    pub fn table(&self) -> &Arc<CharacterTable> {
        &self.table
    }

    /// Returns the number of bytes currently held in the window.
    pub fn filled(&self) -> usize {
        self.filled
    }
}

impl RollingHash for RabinKarpHash {
    #[inline]
    fn consume(&mut self, byte: u8) {
        let incoming = self.table.get(byte);

        if self.filled < self.window.len() {
            self.hash = BASE.wrapping_mul(self.hash).wrapping_add(incoming) & HASH_MASK;
            self.filled += 1;
        } else {
            let outgoing = self.table.get(self.window[self.head]);
            self.hash = BASE
                .wrapping_mul(self.hash)
                .wrapping_add(incoming)
                .wrapping_sub(self.base_pow_window.wrapping_mul(outgoing))
                & HASH_MASK;
        }

        self.window[self.head] = byte;
        self.head += 1;
        if self.head == self.window.len() {
            self.head = 0;
        }
    }

    /// Feeds at most one window of zeros: after that the window is all zeros
    /// and further zeros cannot change the value.
    fn consume_zeros(&mut self, count: usize) {
        for _ in 0..count.min(self.window.len()) {
            self.consume(0);
        }
    }

    #[inline]
    fn value(&self) -> u32 {
        self.hash
    }

    #[inline]
    fn is_warm(&self) -> bool {
        self.filled == self.window.len()
    }

    fn window_size(&self) -> usize {
        self.window.len()
    }

    fn range(&self) -> u64 {
        HASH_RANGE
    }

    fn reset(&mut self) {
        self.hash = 0;
        self.head = 0;
        self.filled = 0;
    }
}
