//! Chunking a [`std::io::Read`] source or an in-memory buffer.
//!
//! - [`ChunkIter`] - Iterator that yields chunks from a reader
//! - [`split_bytes`] - Zero-copy chunking of data already in memory
//!
//! # Example
//!
//! ```no_run
//! use fastchunking::{ChunkIter, ChunkingStrategy};
//! use std::fs::File;
//!
//! let chunker = ChunkingStrategy::rabin_karp(48, 0)?.create_chunker(4096)?;
//! let file = File::open("data.bin")?;
//!
//! for chunk in ChunkIter::new(file, chunker) {
//!     let chunk = chunk?;
//!     println!("{}", chunk);
//! }
//! # Ok::<(), fastchunking::ChunkError>(())
//! ```

use std::io::{ErrorKind, Read};

use bytes::Bytes;

use super::{Assembler, CutSource};
use crate::chunk::Chunk;
use crate::config::ReadConfig;
use crate::error::ChunkError;

/// An iterator that yields chunks from a reader.
///
/// Reads blocks of [`ReadConfig::read_size`] bytes, passes each to the
/// chunker and yields the chunks it completes. The bytes after the last cut
/// are yielded as one final chunk with no level once the reader is exhausted.
///
/// The first read error ends the iteration; it is yielded once and the
/// iterator then returns `None`.
///
/// # Example
///
/// ```
/// use fastchunking::{ChunkIter, ChunkingStrategy};
/// use std::io::Cursor;
///
/// let chunker = ChunkingStrategy::fixed().create_chunker(4)?;
/// let chunks = ChunkIter::new(Cursor::new(b"0123456789".to_vec()), chunker)
///     .collect::<Result<Vec<_>, _>>()?;
///
/// let lens: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
/// assert_eq!(lens, vec![4, 4, 2]);
/// # Ok::<(), fastchunking::ChunkError>(())
/// ```
pub struct ChunkIter<R, C> {
    reader: R,
    assembler: Assembler<C>,
    buffer: Box<[u8]>,
    finished: bool,
}

impl<R: Read, C: CutSource> ChunkIter<R, C> {
    /// Creates an iterator with the default [`ReadConfig`].
    pub fn new(reader: R, chunker: C) -> Self {
        Self::with_config(reader, chunker, ReadConfig::default())
    }

    /// Creates an iterator reading `config.read_size()` bytes at a time.
    ///
    /// `config.prepend_bytes()` zero bytes are virtually placed before the
    /// first block. A zero read size is treated as one byte.
    pub fn with_config(reader: R, chunker: C, config: ReadConfig) -> Self {
        Self {
            reader,
            assembler: Assembler::new(chunker, config.prepend_bytes()),
            buffer: vec![0u8; config.read_size().max(1)].into_boxed_slice(),
            finished: false,
        }
    }

    /// Returns the chunker, e.g. to read its continuation state.
    pub fn chunker(&self) -> &C {
        self.assembler.chunker()
    }

    /// Consumes the iterator and returns the chunker.
    ///
    /// Bytes read but not yet yielded as a chunk are discarded.
    pub fn into_chunker(self) -> C {
        self.assembler.into_chunker()
    }
}

impl<R: Read, C: CutSource> Iterator for ChunkIter<R, C> {
    type Item = Result<Chunk, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(chunk) = self.assembler.pop() {
                return Some(Ok(chunk));
            }
            if self.finished {
                return None;
            }

            match self.reader.read(&mut self.buffer) {
                Ok(0) => {
                    self.finished = true;
                    self.assembler.finish();
                }
                Ok(n) => self.assembler.feed(&self.buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

/// Chunks `data` as one whole stream without copying.
///
/// Every chunk is a slice of `data`. The bytes after the last cut form a
/// final chunk with no level.
///
/// Chunk offsets are relative to the start of `data`, not to the stream.
/// The chunker's state still advances past `data`, so a later call finds the
/// cuts that continue the same stream, but its offsets start again at zero;
/// add the position of each buffer to get stream offsets.
///
/// # Example
///
/// ```
/// use fastchunking::{ChunkingStrategy, split_bytes};
///
/// let mut chunker = ChunkingStrategy::fixed().create_multilevel_chunker(&[5, 10])?;
/// let chunks = split_bytes(&mut chunker, vec![0u8; 22], 0);
///
/// let levels: Vec<Option<usize>> = chunks.iter().map(|c| c.level).collect();
/// assert_eq!(levels, vec![Some(0), Some(1), Some(0), Some(1), None]);
/// # Ok::<(), fastchunking::ChunkError>(())
/// ```
pub fn split_bytes<C: CutSource + ?Sized>(
    chunker: &mut C,
    data: impl Into<Bytes>,
    prepend_bytes: usize,
) -> Vec<Chunk> {
    let data = data.into();
    let mut chunks = Vec::new();
    let mut start = 0;

    for (position, level) in chunker.next_cuts(&data, prepend_bytes) {
        chunks.push(Chunk::new(data.slice(start..position), start as u64, level));
        start = position;
    }

    if start < data.len() {
        chunks.push(Chunk::new(data.slice(start..), start as u64, None));
    }

    chunks
}
