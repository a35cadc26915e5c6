//! Generic multi-level chunking built from independent single-target chunkers.

use std::collections::BTreeMap;

use super::{ChunkBoundaries, LeveledBoundaries};
use crate::error::ChunkError;

/// Runs one child chunker per level and merges their cuts.
///
/// Every child sees the identical `(buf, prepend_bytes)` sequence, so the
/// children stay in lockstep for the whole stream. Cuts are merged in level
/// order; when several children cut at the same position the later (higher)
/// level wins.
///
/// # Example
///
/// ```
/// use fastchunking::{LeveledBoundaries, MultiLevelCombinator, StaticChunker};
///
/// let children = vec![StaticChunker::new(5)?, StaticChunker::new(10)?];
/// let mut chunker = MultiLevelCombinator::new(children)?;
///
/// assert_eq!(
///     chunker.next_chunk_boundaries_levels(&[0u8; 20], 0),
///     vec![(5, 0), (10, 1), (15, 0), (20, 1)]
/// );
/// # Ok::<(), fastchunking::ChunkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MultiLevelCombinator<C> {
    children: Vec<C>,
}

impl<C: ChunkBoundaries> MultiLevelCombinator<C> {
    /// Creates a combinator; `children[i]` produces level `i`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `children` is empty.
    pub fn new(children: Vec<C>) -> Result<Self, ChunkError> {
        if children.is_empty() {
            return Err(ChunkError::invalid("at least one chunk size is required"));
        }
        Ok(Self { children })
    }

    /// Returns the child chunkers, indexed by level.
    pub fn children(&self) -> &[C] {
        &self.children
    }
}

impl<C: ChunkBoundaries> LeveledBoundaries for MultiLevelCombinator<C> {
    fn next_chunk_boundaries_levels(
        &mut self,
        buf: &[u8],
        prepend_bytes: usize,
    ) -> Vec<(usize, usize)> {
        let mut merged = BTreeMap::new();
        for (level, child) in self.children.iter_mut().enumerate() {
            for boundary in child.next_chunk_boundaries(buf, prepend_bytes) {
                merged.insert(boundary, level);
            }
        }
        merged.into_iter().collect()
    }

    fn level_count(&self) -> usize {
        self.children.len()
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }
}

impl<C: ChunkBoundaries> ChunkBoundaries for MultiLevelCombinator<C> {
    fn next_chunk_boundaries(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<usize> {
        self.next_boundaries(buf, prepend_bytes)
    }

    fn reset(&mut self) {
        LeveledBoundaries::reset(self);
    }
}
