//! fastchunking
//!
//! Resumable static and content-defined chunking for Rust.
//!
//! `fastchunking` decides where to cut a byte stream. Bytes arrive in
//! arbitrary buffers; for each buffer a chunker reports the cut offsets that
//! fall inside it, carrying its state across calls so that the cuts depend
//! only on the concatenated stream, never on how it was split. It is a small
//! primitive for:
//!
//! - deduplication
//! - delta synchronization
//! - content-addressable storage
//!
//! Two algorithms are provided:
//!
//! - static chunking, a cut every `chunk_size` bytes
//! - Rabin-Karp content-defined chunking, a cut wherever a rolling hash over
//!   the last `window_size` bytes drops below `2^29 / chunk_size`
//!
//! Both come in a multi-level flavor that cuts for several target chunk sizes
//! in one pass and tags each cut with the level (the index of the largest
//! chunk size) it belongs to.
//!
//! The crate intentionally:
//! - does NOT hash, store or deduplicate chunks
//! - does NOT manage files or concurrency
//!
//! # Boundaries
//!
//! ```
//! use fastchunking::{ChunkBoundaries, ChunkingStrategy, LeveledBoundaries};
//!
//! let strategy = ChunkingStrategy::fixed();
//!
//! let mut chunker = strategy.create_chunker(4)?;
//! assert_eq!(chunker.next_chunk_boundaries(&[0u8; 10], 0), vec![4, 8]);
//! assert_eq!(chunker.next_chunk_boundaries(&[0u8; 10], 0), vec![2, 6, 10]);
//!
//! let mut multi = strategy.create_multilevel_chunker(&[5, 10])?;
//! assert_eq!(
//!     multi.next_chunk_boundaries_levels(&[0u8; 20], 0),
//!     vec![(5, 0), (10, 1), (15, 0), (20, 1)]
//! );
//! # Ok::<(), fastchunking::ChunkError>(())
//! ```
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use fastchunking::{ChunkError, ChunkIter, ChunkingStrategy};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let chunker = ChunkingStrategy::rabin_karp(48, 0)?.create_chunker(8192)?;
//!     let file = File::open("data.bin")?;
//!
//!     for chunk in ChunkIter::new(file, chunker) {
//!         let chunk = chunk?;
//!         println!("chunk {} bytes at {}", chunk.len(), chunk.offset);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use fastchunking::{ChunkingStrategy, chunk_async};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), fastchunking::ChunkError> {
//!     let chunker = ChunkingStrategy::default().create_chunker(8192)?;
//!     let mut stream = chunk_async(reader, chunker);
//!
//!     while let Some(chunk) = stream.next().await {
//!         let chunk = chunk?;
//!         println!("chunk {}", chunk.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cdc;
mod chunk;
mod chunker;
mod config;
mod error;
mod strategy;

#[cfg(feature = "async-io")]
mod async_stream;

pub use cdc::{
    BASE, CharacterTable, HASH_BITS, HASH_MASK, HASH_RANGE, RabinKarpHash, RollingHash,
};
pub use chunk::Chunk;
pub use chunker::{
    ChunkBoundaries, ChunkIter, Chunker, ContentDefinedChunker, CutSource, LeveledBoundaries,
    MultiLevelChunker, MultiLevelCombinator, MultiThresholdChunker, Phase, StaticChunker,
    split_bytes,
};
pub use config::{
    DEFAULT_READ_SIZE, DEFAULT_SEED, DEFAULT_WINDOW_SIZE, RabinKarpConfig, ReadConfig,
    StrategyConfig,
};
pub use error::ChunkError;
pub use strategy::{ChunkingStrategy, RabinKarpStrategy};

#[cfg(feature = "async-io")]
pub use async_stream::{ChunkStream, chunk_async};
