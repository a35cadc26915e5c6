//! Async stream adapter for chunking.
//!
//! Uses `futures_io::AsyncRead`, so it works with tokio (through
//! `tokio_util::compat`), async-std, smol or any other futures-compatible
//! runtime.

use std::io::ErrorKind;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::chunk::Chunk;
use crate::chunker::{Assembler, CutSource};
use crate::config::ReadConfig;
use crate::error::ChunkError;

pin_project! {
    /// A stream that yields chunks from an async reader.
    ///
    /// Behaves like [`ChunkIter`](crate::ChunkIter): blocks are read, passed
    /// to the chunker, and the completed chunks are yielded in order. The
    /// bytes after the last cut are yielded as a final chunk with no level.
    pub struct ChunkStream<R, C> {
        #[pin]
        reader: R,
        assembler: Assembler<C>,
        buffer: Box<[u8]>,
        finished: bool,
    }
}

impl<R: AsyncRead, C: CutSource> ChunkStream<R, C> {
    /// Creates a stream reading `config.read_size()` bytes at a time.
    ///
    /// `config.prepend_bytes()` zero bytes are virtually placed before the
    /// first block.
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
}

impl<R: AsyncRead, C: CutSource> Stream for ChunkStream<R, C> {
    type Item = Result<Chunk, ChunkError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(chunk) = this.assembler.pop() {
                return Poll::Ready(Some(Ok(chunk)));
            }
            if *this.finished {
                return Poll::Ready(None);
            }

            match this.reader.as_mut().poll_read(cx, this.buffer) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(0)) => {
                    *this.finished = true;
                    this.assembler.finish();
                }
                Poll::Ready(Ok(n)) => this.assembler.feed(&this.buffer[..n]),
                Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(ChunkError::Io(e))));
                }
            }
        }
    }
}

/// Creates a chunk stream from an async reader with the default [`ReadConfig`].
///
/// For tokio readers, convert with `tokio_util::compat`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use fastchunking::{ChunkingStrategy, chunk_async};
///
/// let file = tokio::fs::File::open("data.bin").await?;
/// let chunker = ChunkingStrategy::default().create_chunker(4096)?;
/// let stream = chunk_async(file.compat(), chunker);
/// ```
///
/// # Example
///
/// ```
/// use fastchunking::{ChunkingStrategy, chunk_async};
/// use futures_util::StreamExt;
///
/// async fn total_len(data: &[u8]) -> Result<usize, fastchunking::ChunkError> {
///     let chunker = ChunkingStrategy::fixed().create_chunker(16)?;
///     let mut stream = chunk_async(data, chunker);
///
///     let mut total = 0;
///     while let Some(chunk) = stream.next().await {
///         total += chunk?.len();
///     }
///     Ok(total)
/// }
/// ```
pub fn chunk_async<R: AsyncRead, C: CutSource>(reader: R, chunker: C) -> ChunkStream<R, C> {
    ChunkStream::with_config(reader, chunker, ReadConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::{ChunkBoundaries, StaticChunker};
    use crate::strategy::ChunkingStrategy;
    use futures_util::StreamExt;

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

    #[tokio::test]
    async fn test_chunk_stream_empty() {
        let reader: &[u8] = &[];
        let chunks: Vec<_> = chunk_async(reader, StaticChunker::new(4).unwrap())
            .collect()
            .await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_chunk_stream_static() {
        let data = vec![0u8; 10];
        let chunks: Vec<Chunk> = chunk_async(&data[..], StaticChunker::new(4).unwrap())
            .map(|c| c.unwrap())
            .collect()
            .await;

        let lens: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(lens, vec![4, 4, 2]);
        assert_eq!(chunks[2].offset, 8);
        assert_eq!(chunks[2].level, None);
    }

    #[tokio::test]
    async fn test_chunk_stream_matches_boundaries() {
        let data = pseudo_random(40_000, 9);
        let strategy = ChunkingStrategy::default();
        let expected = strategy
            .create_chunker(256)
            .unwrap()
            .next_chunk_boundaries(&data, 0);

        let config = ReadConfig::default().with_read_size(333);
        let stream =
            ChunkStream::with_config(&data[..], strategy.create_chunker(256).unwrap(), config);
        let chunks: Vec<Chunk> = stream.map(|c| c.unwrap()).collect().await;

        let ends: Vec<usize> = chunks.iter().map(|c| c.end() as usize).collect();
        assert_eq!(&ends[..expected.len()], &expected[..]);
        assert_eq!(ends.last().copied(), Some(data.len()));
    }

    #[tokio::test]
    async fn test_chunk_stream_levels() {
        let chunker = ChunkingStrategy::fixed()
            .create_multilevel_chunker(&[5, 10])
            .unwrap();
        let data = vec![0u8; 22];
        let levels: Vec<Option<usize>> = chunk_async(&data[..], chunker)
            .map(|c| c.unwrap().level)
            .collect()
            .await;
        assert_eq!(levels, vec![Some(0), Some(1), Some(0), Some(1), None]);
    }
}
