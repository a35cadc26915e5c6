//! Static (fixed-size) chunking.
//!
//! The only state is the [`Phase`]: how many bytes remain until the next cut.
//! A call with a virtual lead-in first rewinds the phase by the lead-in
//! length, emits every `chunk_size`-th position from there, and then advances
//! that rewound phase past the buffer. The lead-in therefore shifts this call's
//! offsets and the persisted phase alike, but never counts as stream length.

use super::ChunkBoundaries;
use crate::config::validate_chunk_size;
use crate::error::ChunkError;

/// Bytes remaining until the next static cut, in `1..=chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phase(usize);

impl Phase {
    /// The phase of a stream that has not consumed anything yet.
    pub const fn start(chunk_size: usize) -> Self {
        Phase(chunk_size)
    }

    /// Wraps a phase persisted elsewhere. Checked by [`StaticChunker::resume`].
    pub const fn new(remaining: usize) -> Self {
        Phase(remaining)
    }

    /// Returns the number of bytes remaining until the next cut.
    pub const fn get(self) -> usize {
        self.0
    }

    /// Phase after consuming `consumed` more bytes.
    ///
    /// Computes `((phase - consumed - 1) mod chunk_size) + 1`. No
    /// intermediate value exceeds `chunk_size`.
    fn advance(self, consumed: usize, chunk_size: usize) -> Self {
        let back = consumed % chunk_size;
        if self.0 > back {
            Phase(self.0 - back)
        } else {
            Phase(self.0 + (chunk_size - back))
        }
    }
}

/// Cuts the stream every `chunk_size` bytes.
///
/// # Example
///
/// ```
/// use fastchunking::{ChunkBoundaries, StaticChunker};
///
/// let mut chunker = StaticChunker::new(2)?;
/// assert_eq!(chunker.next_chunk_boundaries(b"0000", 0), vec![2, 4]);
/// assert_eq!(chunker.next_chunk_boundaries(b"0", 0), Vec::<usize>::new());
/// assert_eq!(chunker.next_chunk_boundaries(b"0", 0), vec![1]);
/// # Ok::<(), fastchunking::ChunkError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticChunker {
    chunk_size: usize,
    phase: Phase,
}

impl StaticChunker {
    /// Creates a chunker at the start of a stream.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self, ChunkError> {
        let chunk_size = validate_chunk_size(chunk_size)?;
        Ok(Self {
            chunk_size,
            phase: Phase::start(chunk_size),
        })
    }

    /// Recreates a chunker from a phase previously read with [`StaticChunker::phase`].
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `chunk_size` is zero or the
    /// phase is outside `1..=chunk_size`.
    pub fn resume(chunk_size: usize, phase: Phase) -> Result<Self, ChunkError> {
        let chunk_size = validate_chunk_size(chunk_size)?;
        if phase.get() == 0 || phase.get() > chunk_size {
            return Err(ChunkError::invalid("phase must be within 1..=chunk_size"));
        }
        Ok(Self { chunk_size, phase })
    }

    /// Returns the chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the continuation state.
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl ChunkBoundaries for StaticChunker {
    fn next_chunk_boundaries(&mut self, buf: &[u8], prepend_bytes: usize) -> Vec<usize> {
        let phase = self.phase.advance(prepend_bytes, self.chunk_size);
        let boundaries: Vec<usize> = (phase.get()..=buf.len()).step_by(self.chunk_size).collect();
        self.phase = phase.advance(buf.len(), self.chunk_size);
        boundaries
    }

    fn reset(&mut self) {
        self.phase = Phase::start(self.chunk_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros(n: usize) -> Vec<u8> {
        vec![b'0'; n]
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(StaticChunker::new(0).is_err());
    }

    #[test]
    fn test_chunk_size_1() {
        let mut chunker = StaticChunker::new(1).unwrap();
        assert_eq!(chunker.next_chunk_boundaries(&zeros(3), 0), vec![1, 2, 3]);
        assert_eq!(chunker.next_chunk_boundaries(&zeros(1), 0), vec![1]);
    }

    #[test]
    fn test_chunk_size_2() {
        let mut chunker = StaticChunker::new(2).unwrap();
        assert_eq!(chunker.next_chunk_boundaries(&zeros(4), 0), vec![2, 4]);
        assert!(chunker.next_chunk_boundaries(&zeros(1), 0).is_empty());
        assert_eq!(chunker.next_chunk_boundaries(&zeros(1), 0), vec![1]);
        assert_eq!(chunker.next_chunk_boundaries(&zeros(3), 0), vec![2]);
        assert_eq!(chunker.next_chunk_boundaries(&zeros(3), 0), vec![1, 3]);
    }

    #[test]
    fn test_chunk_size_3_with_empty_buffers() {
        let mut chunker = StaticChunker::new(3).unwrap();
        assert_eq!(chunker.next_chunk_boundaries(&zeros(9), 0), vec![3, 6, 9]);
        assert_eq!(chunker.next_chunk_boundaries(&zeros(10), 0), vec![3, 6, 9]);
        assert_eq!(chunker.next_chunk_boundaries(&zeros(2), 0), vec![2]);
        assert_eq!(chunker.next_chunk_boundaries(&zeros(11), 0), vec![3, 6, 9]);
        assert_eq!(chunker.next_chunk_boundaries(&zeros(1), 0), vec![1]);
        assert!(chunker.next_chunk_boundaries(&[], 0).is_empty());
        assert!(chunker.next_chunk_boundaries(&[], 0).is_empty());
        assert_eq!(chunker.next_chunk_boundaries(&zeros(3), 0), vec![3]);
    }

    #[test]
    fn test_chunk_size_4() {
        let mut chunker = StaticChunker::new(4).unwrap();
        assert_eq!(chunker.next_chunk_boundaries(&zeros(12), 0), vec![4, 8, 12]);
        assert!(chunker.next_chunk_boundaries(&zeros(2), 0).is_empty());
        assert_eq!(chunker.next_chunk_boundaries(&zeros(12), 0), vec![2, 6, 10]);
        assert!(chunker.next_chunk_boundaries(&zeros(1), 0).is_empty());
        assert_eq!(chunker.next_chunk_boundaries(&zeros(12), 0), vec![1, 5, 9]);
        assert_eq!(chunker.next_chunk_boundaries(&zeros(1), 0), vec![1]);
    }

    #[test]
    fn test_prepend_shifts_offsets() {
        let mut chunker = StaticChunker::new(4).unwrap();
        // One virtual byte: the first cut moves one position earlier.
        assert_eq!(chunker.next_chunk_boundaries(&zeros(10), 1), vec![3, 7]);
    }

    #[test]
    fn test_prepend_larger_than_chunk_size() {
        let mut chunker = StaticChunker::new(4).unwrap();
        // 9 virtual bytes are 2 full chunks plus one byte.
        assert_eq!(chunker.next_chunk_boundaries(&zeros(10), 9), vec![3, 7]);
    }

    #[test]
    fn test_prepend_is_baked_into_phase() {
        let mut with_prepend = StaticChunker::new(4).unwrap();
        with_prepend.next_chunk_boundaries(&zeros(2), 1);
        // Rewound to 3, advanced by 2.
        assert_eq!(with_prepend.phase().get(), 1);

        let mut without = StaticChunker::new(4).unwrap();
        without.next_chunk_boundaries(&zeros(2), 0);
        assert_eq!(without.phase().get(), 2);
    }

    #[test]
    fn test_phase_advance() {
        assert_eq!(Phase::start(4).advance(0, 4).get(), 4);
        assert_eq!(Phase::start(4).advance(1, 4).get(), 3);
        assert_eq!(Phase::start(4).advance(4, 4).get(), 4);
        assert_eq!(Phase::start(4).advance(5, 4).get(), 3);
        assert_eq!(Phase(1).advance(1, 4).get(), 4);
        assert_eq!(Phase(2).advance(7, 4).get(), 3);
    }

    #[test]
    fn test_huge_chunk_size_with_prepend() {
        let mut chunker = StaticChunker::new(usize::MAX).unwrap();
        assert!(chunker.next_chunk_boundaries(&[0u8; 5], 3).is_empty());
        // Rewound by 3 for the lead-in, then by 5 for the buffer.
        assert_eq!(chunker.phase().get(), usize::MAX - 8);

        let mut near_cut = StaticChunker::resume(usize::MAX, Phase::new(2)).unwrap();
        assert_eq!(near_cut.next_chunk_boundaries(&[0u8; 5], 0), vec![2]);
        assert_eq!(near_cut.phase().get(), usize::MAX - 3);

        let mut wrapped = StaticChunker::resume(usize::MAX, Phase::new(1)).unwrap();
        assert!(wrapped.next_chunk_boundaries(&[], usize::MAX).is_empty());
        assert_eq!(wrapped.phase().get(), 1);
    }

    #[test]
    fn test_resume() {
        let mut original = StaticChunker::new(5).unwrap();
        original.next_chunk_boundaries(&zeros(7), 0);

        let mut resumed = StaticChunker::resume(5, original.phase()).unwrap();
        assert_eq!(
            original.next_chunk_boundaries(&zeros(20), 0),
            resumed.next_chunk_boundaries(&zeros(20), 0)
        );

        assert!(StaticChunker::resume(5, Phase(0)).is_err());
        assert!(StaticChunker::resume(5, Phase(6)).is_err());
        assert!(StaticChunker::resume(0, Phase(1)).is_err());
    }

    #[test]
    fn test_reset() {
        let mut chunker = StaticChunker::new(3).unwrap();
        chunker.next_chunk_boundaries(&zeros(5), 0);
        chunker.reset();
        assert_eq!(chunker.phase(), Phase::start(3));
        assert_eq!(chunker.next_chunk_boundaries(&zeros(6), 0), vec![3, 6]);
    }
}
