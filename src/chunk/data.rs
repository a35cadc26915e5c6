//! The Chunk type - a byte range between two consecutive cuts.

use bytes::Bytes;
use std::fmt;

/// A chunk of the stream with its position and the level that cut it.
///
/// # Example
///
/// ```
/// use fastchunking::Chunk;
/// use bytes::Bytes;
///
/// let chunk = Chunk {
///     data: Bytes::from_static(b"hello world"),
///     offset: 100,
///     level: Some(1),
/// };
///
/// assert_eq!(chunk.len(), 11);
/// assert_eq!(chunk.range(), 100..111);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk data.
    pub data: Bytes,

    /// Offset of the first byte.
    ///
    /// Stream offset for chunks from [`ChunkIter`](crate::ChunkIter) and
    /// `ChunkStream`; offset within the passed buffer for
    /// [`split_bytes`](crate::split_bytes).
    pub offset: u64,

    /// Level whose cut ends this chunk.
    ///
    /// `None` for single-target chunkers and for the trailing bytes after the
    /// last cut of a stream.
    pub level: Option<usize>,
}

impl Chunk {
    /// Creates a new chunk.
    pub fn new(data: impl Into<Bytes>, offset: u64, level: Option<usize>) -> Self {
        Self {
            data: data.into(),
            offset,
            level,
        }
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the start offset.
    pub fn start(&self) -> u64 {
        self.offset
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the chunk as a range of stream offsets.
    pub fn range(&self) -> std::ops::Range<u64> {
        self.start()..self.end()
    }

    /// Consumes the chunk and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({} bytes @ {}", self.len(), self.offset)?;
        if let Some(level) = self.level {
            write!(f, ", level={}", level)?;
        }
        write!(f, ")")
    }
}
