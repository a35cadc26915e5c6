//! Multi-level chunking example.
//!
//! Cuts one stream for three target chunk sizes at once and counts the
//! chunks each level would produce on its own.
//!
//! Run with:
//!     cargo run --example multilevel

use fastchunking::{ChunkingStrategy, LeveledBoundaries};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Deterministic pseudo-random data
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    let data: Vec<u8> = (0..4 * 1024 * 1024)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 32) as u8
        })
        .collect();

    let sizes = [4 * 1024, 16 * 1024, 64 * 1024];
    let strategy = ChunkingStrategy::default();
    let mut chunker = strategy.create_multilevel_chunker(&sizes)?;

    println!("Chunking {} bytes for sizes {:?}...\n", data.len(), sizes);

    // Feed in batches, as a network reader would
    let mut counts = [0usize; 3];
    for batch in data.chunks(100_000) {
        for (_, level) in chunker.next_chunk_boundaries_levels(batch, 0) {
            counts[level] += 1;
        }
    }

    // A cut at level k is also a cut for every level below it.
    for (level, size) in sizes.iter().enumerate() {
        let cuts: usize = counts[level..].iter().sum();
        println!(
            "Level {} (target {:>6} bytes): {:>5} cuts, average {:>6} bytes",
            level,
            size,
            cuts,
            data.len() / cuts.max(1)
        );
    }

    Ok(())
}
