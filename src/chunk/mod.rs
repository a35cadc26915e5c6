//! Chunk types.
//!
//! - [`Chunk`] - Stream bytes between two cuts, with offset and level

mod data;

pub use data::Chunk;
