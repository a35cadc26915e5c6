//! Async streaming support for chunking.
//!
//! - [`chunk_async`] - Creates an async stream of chunks from an async reader
//! - [`ChunkStream`] - The stream itself, configurable through [`ReadConfig`](crate::ReadConfig)
//!
//! This module requires the `async-io` feature to be enabled.

mod stream;

pub use stream::{ChunkStream, chunk_async};
