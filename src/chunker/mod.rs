//! Boundary-detection engines.
//!
//! Every chunker is a small piece of continuation state that is fed
//! successive buffers of one logical stream and answers, per buffer, where
//! the cuts fall relative to that buffer.
//!
//! - [`StaticChunker`] - Fixed-size cuts driven by a persisted [`Phase`]
//! - [`ContentDefinedChunker`] - One rolling hash, one threshold
//! - [`MultiThresholdChunker`] - One rolling hash, several thresholds
//! - [`MultiLevelCombinator`] - Runs several single-target chunkers in lockstep
//! - [`Chunker`] / [`MultiLevelChunker`] - What a strategy hands out
//! - [`ChunkIter`] - Drives a chunker from a [`std::io::Read`] source

mod assemble;
mod combinator;
mod content_defined;
mod fixed;
mod iter;
mod multi_threshold;

pub(crate) use assemble::Assembler;
pub use combinator::MultiLevelCombinator;
pub use content_defined::ContentDefinedChunker;
pub use fixed::{Phase, StaticChunker};
pub use iter::{ChunkIter, split_bytes};
pub use multi_threshold::MultiThresholdChunker;

use crate::cdc::RabinKarpHash;

/// A single-target chunker.
///
/// Calling [`next_chunk_boundaries`](ChunkBoundaries::next_chunk_boundaries)
/// repeatedly is equivalent to chunking the concatenation of every buffer
/// ever supplied. `prepend_bytes` virtual zero bytes are placed before `buf`
/// for this call only; they are never reported and do not extend the stream.
pub trait ChunkBoundaries {
    /// Returns the cuts inside `buf`, strictly increasing, each in `1..=buf.len()`.
    fn next_chunk_boundaries(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<usize>;

    /// Restores the state of a freshly constructed chunker.
    fn reset(&mut self);
}

/// A chunker cutting for several target chunk sizes at once.
///
/// Levels index the configured chunk sizes. When one position is a cut for
/// several levels it is reported once, with the highest of them; this only
/// means "largest chunk size" when the sizes were supplied in ascending order.
pub trait LeveledBoundaries {
    /// Returns `(position, level)` pairs sorted by position.
    fn next_chunk_boundaries_levels(
        &mut self,
        buf: &[u8],
        prepend_bytes: usize,
    ) -> Vec<(usize, usize)>;

    /// Number of configured levels.
    fn level_count(&self) -> usize;

    /// Restores the state of a freshly constructed chunker.
    fn reset(&mut self);

    /// Same cuts as [`next_chunk_boundaries_levels`](LeveledBoundaries::next_chunk_boundaries_levels)
    /// without the levels.
    fn next_boundaries(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<usize> {
        self.next_chunk_boundaries_levels(buf, prepend_bytes)
            .into_iter()
            .map(|(position, _)| position)
            .collect()
    }
}

/// Anything the stream adapters can pull cuts from.
///
/// Single-target chunkers report `None` levels.
pub trait CutSource {
    /// Returns `(position, level)` pairs for `buf`, sorted by position.
    fn next_cuts(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<(usize, Option<usize>)>;
}

/// A single-target chunker produced by a [`ChunkingStrategy`](crate::ChunkingStrategy).
#[derive(Debug, Clone)]
pub enum Chunker {
    /// Fixed-size chunking.
    Static(StaticChunker),

    /// Rabin-Karp content-defined chunking.
    RabinKarp(ContentDefinedChunker<RabinKarpHash>),
}

impl Chunker {
    /// Returns the target chunk size.
    pub fn chunk_size(&self) -> usize {
        match self {
            Chunker::Static(chunker) => chunker.chunk_size(),
            Chunker::RabinKarp(chunker) => chunker.chunk_size(),
        }
    }
}

impl ChunkBoundaries for Chunker {
    fn next_chunk_boundaries(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<usize> {
        match self {
            Chunker::Static(chunker) => chunker.next_chunk_boundaries(buf, prepend_bytes),
            Chunker::RabinKarp(chunker) => chunker.next_chunk_boundaries(buf, prepend_bytes),
        }
    }

    fn reset(&mut self) {
        match self {
            Chunker::Static(chunker) => ChunkBoundaries::reset(chunker),
            Chunker::RabinKarp(chunker) => ChunkBoundaries::reset(chunker),
        }
    }
}

/// A multi-target chunker produced by a [`ChunkingStrategy`](crate::ChunkingStrategy).
#[derive(Debug, Clone)]
pub enum MultiLevelChunker {
    /// One static chunker per level, merged.
    Static(MultiLevelCombinator<StaticChunker>),

    /// One shared rolling hash tested against every threshold.
    RabinKarp(MultiThresholdChunker<RabinKarpHash>),
}

impl LeveledBoundaries for MultiLevelChunker {
    fn next_chunk_boundaries_levels(
        &mut self,
        buf: &[u8],
        prepend_bytes: usize,
    ) -> Vec<(usize, usize)> {
        match self {
            MultiLevelChunker::Static(chunker) => {
                chunker.next_chunk_boundaries_levels(buf, prepend_bytes)
            }
            MultiLevelChunker::RabinKarp(chunker) => {
                chunker.next_chunk_boundaries_levels(buf, prepend_bytes)
            }
        }
    }

    fn level_count(&self) -> usize {
        match self {
            MultiLevelChunker::Static(chunker) => chunker.level_count(),
            MultiLevelChunker::RabinKarp(chunker) => chunker.level_count(),
        }
    }

    fn reset(&mut self) {
        match self {
            MultiLevelChunker::Static(chunker) => LeveledBoundaries::reset(chunker),
            MultiLevelChunker::RabinKarp(chunker) => LeveledBoundaries::reset(chunker),
        }
    }
}

impl ChunkBoundaries for MultiLevelChunker {
    fn next_chunk_boundaries(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<usize> {
        self.next_boundaries(buf, prepend_bytes)
    }

    fn reset(&mut self) {
        LeveledBoundaries::reset(self);
    }
}

impl CutSource for Chunker {
    fn next_cuts(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<(usize, Option<usize>)> {
        unleveled(self.next_chunk_boundaries(buf, prepend_bytes))
    }
}

impl CutSource for MultiLevelChunker {
    fn next_cuts(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<(usize, Option<usize>)> {
        leveled(self.next_chunk_boundaries_levels(buf, prepend_bytes))
    }
}

impl CutSource for StaticChunker {
    fn next_cuts(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<(usize, Option<usize>)> {
        unleveled(self.next_chunk_boundaries(buf, prepend_bytes))
    }
}

impl<H: crate::cdc::RollingHash> CutSource for ContentDefinedChunker<H> {
    fn next_cuts(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<(usize, Option<usize>)> {
        unleveled(self.next_chunk_boundaries(buf, prepend_bytes))
    }
}

impl<H: crate::cdc::RollingHash> CutSource for MultiThresholdChunker<H> {
    fn next_cuts(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<(usize, Option<usize>)> {
        leveled(self.next_chunk_boundaries_levels(buf, prepend_bytes))
    }
}

impl<C: ChunkBoundaries> CutSource for MultiLevelCombinator<C> {
    fn next_cuts(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<(usize, Option<usize>)> {
        leveled(self.next_chunk_boundaries_levels(buf, prepend_bytes))
    }
}

fn unleveled(boundaries: Vec<usize>) -> Vec<(usize, Option<usize>)> {
    boundaries.into_iter().map(|position| (position, None)).collect()
}

fn leveled(boundaries: Vec<(usize, usize)>) -> Vec<(usize, Option<usize>)> {
    boundaries
        .into_iter()
        .map(|(position, level)| (position, Some(level)))
        .collect()
}
