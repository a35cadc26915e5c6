//! Multi-level content-defined chunking over one shared rolling hash.
//!
//! Thresholds are derived from ascending chunk sizes, so they are descending:
//! `T_0 >= T_1 >= ... >= T_{n-1}`. A hash value below a strict threshold is
//! below every looser one too, which means a single hash evaluation decides
//! all levels at a position. The reported level is the highest index whose
//! threshold is satisfied, found by scanning from the strict end.

use super::{ChunkBoundaries, LeveledBoundaries};
use crate::cdc::{RabinKarpHash, RollingHash, threshold_for};
use crate::config::validate_chunk_sizes;
use crate::error::ChunkError;

/// Content-defined chunker for several target chunk sizes in one pass.
///
/// # Example
///
/// ```
/// use fastchunking::{LeveledBoundaries, MultiThresholdChunker, RabinKarpHash};
///
/// let hash = RabinKarpHash::new(48, 0)?;
/// let mut chunker = MultiThresholdChunker::new(hash, &[16, 64, 256])?;
///
/// let data: Vec<u8> = (0..8192u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
/// for (position, level) in chunker.next_chunk_boundaries_levels(&data, 0) {
///     assert!(position <= data.len());
///     assert!(level < 3);
/// }
/// # Ok::<(), fastchunking::ChunkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MultiThresholdChunker<H = RabinKarpHash> {
    hash: H,
    chunk_sizes: Box<[usize]>,
    thresholds: Box<[u64]>,
}

impl<H: RollingHash> MultiThresholdChunker<H> {
    /// Creates a chunker around `hash`, one level per entry of `chunk_sizes`.
    ///
    /// `chunk_sizes` should be ascending; this is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `chunk_sizes` is empty or
    /// contains a zero.
    pub fn new(hash: H, chunk_sizes: &[usize]) -> Result<Self, ChunkError> {
        validate_chunk_sizes(chunk_sizes)?;
        let range = hash.range();
        let thresholds = chunk_sizes
            .iter()
            .map(|&size| threshold_for(range, size))
            .collect();

        Ok(Self {
            hash,
            chunk_sizes: chunk_sizes.into(),
            thresholds,
        })
    }

    /// Returns the configured chunk sizes, indexed by level.
    pub fn chunk_sizes(&self) -> &[usize] {
        &self.chunk_sizes
    }

    /// Returns the absolute thresholds, indexed by level.
    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    /// Returns the shared rolling hash.
    pub fn engine(&self) -> &H {
        &self.hash
    }
}

impl<H: RollingHash> LeveledBoundaries for MultiThresholdChunker<H> {
    fn next_chunk_boundaries_levels(
        &mut self,
        buf: &[u8],
        prepend_bytes: usize,
    ) -> Vec<(usize, usize)> {
        self.hash.consume_zeros(prepend_bytes);

        let mut boundaries = Vec::new();
        for (i, &byte) in buf.iter().enumerate() {
            self.hash.consume(byte);
            if !self.hash.is_warm() {
                continue;
            }

            let value = u64::from(self.hash.value());
            if let Some(level) = self.thresholds.iter().rposition(|&t| value < t) {
                boundaries.push((i + 1, level));
            }
        }
        boundaries
    }

    fn level_count(&self) -> usize {
        self.thresholds.len()
    }

    fn reset(&mut self) {
        self.hash.reset();
    }
}

impl<H: RollingHash> ChunkBoundaries for MultiThresholdChunker<H> {
    fn next_chunk_boundaries(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<usize> {
        self.next_boundaries(buf, prepend_bytes)
    }

    fn reset(&mut self) {
        LeveledBoundaries::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::ContentDefinedChunker;

    fn pseudo_random(len: usize, mut state: u64) -> Vec<u8> {
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state >> 32) as u8
            })
            .collect()
    }

    fn chunker(sizes: &[usize]) -> MultiThresholdChunker {
        MultiThresholdChunker::new(RabinKarpHash::new(48, 0).unwrap(), sizes).unwrap()
    }

    fn standalone(size: usize) -> ContentDefinedChunker {
        ContentDefinedChunker::new(RabinKarpHash::new(48, 0).unwrap(), size).unwrap()
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        let hash = RabinKarpHash::new(48, 0).unwrap();
        assert!(MultiThresholdChunker::new(hash.clone(), &[]).is_err());
        assert!(MultiThresholdChunker::new(hash, &[16, 0]).is_err());
    }

    #[test]
    fn test_thresholds_descend() {
        let chunker = chunker(&[16, 32, 64]);
        assert_eq!(chunker.level_count(), 3);
        assert_eq!(chunker.chunk_sizes(), &[16, 32, 64]);
        assert!(chunker.thresholds().windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_single_level_matches_standalone() {
        let data = pseudo_random(30_000, 11);
        let multi = chunker(&[64]).next_boundaries(&data, 0);
        let single = standalone(64).next_chunk_boundaries(&data, 0);
        assert_eq!(multi, single);
    }

    #[test]
    fn test_union_equals_loosest_level() {
        let data = pseudo_random(30_000, 12);
        let multi = chunker(&[16, 64, 256]).next_boundaries(&data, 0);
        let loosest = standalone(16).next_chunk_boundaries(&data, 0);
        assert_eq!(multi, loosest);
    }

    #[test]
    fn test_levels_are_subsumed_by_standalone_chunkers() {
        let sizes = [16, 64, 256];
        let data = pseudo_random(60_000, 13);
        let leveled = chunker(&sizes).next_chunk_boundaries_levels(&data, 0);

        let standalone: Vec<Vec<usize>> = sizes
            .iter()
            .map(|&size| standalone(size).next_chunk_boundaries(&data, 0))
            .collect();

        for &(position, level) in &leveled {
            // Reported at the highest level that cuts here, and at no higher one.
            assert!(standalone[level].binary_search(&position).is_ok());
            for higher in &standalone[level + 1..] {
                assert!(higher.binary_search(&position).is_err());
            }
        }

        assert!(leveled.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(leveled.iter().any(|&(_, level)| level == 2));
    }

    #[test]
    fn test_split_invariance_with_levels() {
        let data = pseudo_random(20_000, 14);
        let whole = chunker(&[16, 128]).next_chunk_boundaries_levels(&data, 0);

        let split = 7_777;
        let mut split_chunker = chunker(&[16, 128]);
        let mut parts = split_chunker.next_chunk_boundaries_levels(&data[..split], 0);
        parts.extend(
            split_chunker
                .next_chunk_boundaries_levels(&data[split..], 0)
                .into_iter()
                .map(|(b, level)| (b + split, level)),
        );
        assert_eq!(parts, whole);
    }

    #[test]
    fn test_lead_in() {
        let data = pseudo_random(5_000, 15);
        let mut padded = vec![0u8; 10];
        padded.extend_from_slice(&data);

        let reference: Vec<(usize, usize)> = chunker(&[8, 32])
            .next_chunk_boundaries_levels(&padded, 0)
            .into_iter()
            .filter(|&(b, _)| b > 10)
            .collect();
        let with_lead_in: Vec<(usize, usize)> = chunker(&[8, 32])
            .next_chunk_boundaries_levels(&data, 10)
            .into_iter()
            .map(|(b, level)| (b + 10, level))
            .collect();
        assert_eq!(reference, with_lead_in);
    }
}
