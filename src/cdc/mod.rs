//! Rolling hash engines for content-defined chunking.
//!
//! A content-defined chunker only needs a small capability from its hash: eat
//! one byte in O(1), report a value that looks uniform over a fixed range, and
//! say whether a full window has been consumed yet. [`RollingHash`] names that
//! capability; [`RabinKarpHash`] is the implementation the strategies use.
//!
//! - [`RabinKarpHash`] - Rabin-Karp polynomial hash over a fixed window
//! - [`CharacterTable`] - Seeded per-byte table the polynomial is built from

mod rabinkarp;
mod table;

pub use rabinkarp::{BASE, HASH_BITS, HASH_MASK, HASH_RANGE, RabinKarpHash};
pub use table::CharacterTable;

/// A hash over the trailing `window_size()` bytes of everything consumed.
///
/// Implementations must be deterministic in `(configuration, byte history)`
/// and produce values in `0..range()`.
pub trait RollingHash {
    /// Consumes one byte, evicting the byte that leaves the window.
    fn consume(&mut self, byte: u8);

    /// Consumes `count` zero bytes.
    ///
    /// The default feeds them one at a time; implementations whose value only
    /// depends on the window contents may stop after a full window.
    fn consume_zeros(&mut self, count: usize) {
        for _ in 0..count {
            self.consume(0);
        }
    }

    /// Returns the current hash value.
    fn value(&self) -> u32;

    /// Returns true once at least `window_size()` bytes have been consumed.
    fn is_warm(&self) -> bool;

    /// Returns the window size in bytes.
    fn window_size(&self) -> usize;

    /// Returns the exclusive upper bound of [`RollingHash::value`].
    fn range(&self) -> u64;

    /// Forgets all consumed bytes.
    fn reset(&mut self);
}

/// Resolves a target chunk size to an absolute cut threshold.
///
/// A position is a cut when the hash value is below the threshold, so the
/// cut probability per position is about `1 / chunk_size`.
pub(crate) fn threshold_for(range: u64, chunk_size: usize) -> u64 {
    range / chunk_size as u64
}
