//! File chunking example.
//!
//! Run with:
//!     cargo run --example sync_file -- /path/to/file

use std::env;
use std::fs::File;

use fastchunking::{ChunkIter, ChunkingStrategy, ReadConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Chunking file: {}\n", path);

    let file = File::open(&path)?;
    println!("File size: {} bytes\n", file.metadata()?.len());

    let strategy = ChunkingStrategy::rabin_karp(48, 0)?;
    let chunker = strategy.create_chunker(32 * 1024)?;

    // Let the first chunk start without a full window of real bytes.
    let config = ReadConfig::default().with_prepend_bytes(strategy.window_size());

    let mut total_chunks = 0;
    let mut total_bytes = 0;

    for chunk in ChunkIter::with_config(file, chunker, config) {
        let chunk = chunk?;
        total_chunks += 1;
        total_bytes += chunk.len();

        println!(
            "Chunk {}: offset={:>10}, len={:>8}",
            total_chunks,
            chunk.offset,
            chunk.len()
        );
    }

    println!("\nTotal: {} chunks, {} bytes", total_chunks, total_bytes);
    if total_chunks > 0 {
        println!("Average chunk size: {} bytes", total_bytes / total_chunks);
    }

    Ok(())
}
