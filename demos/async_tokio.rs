//! Async chunking of several files with tokio.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io -- FILE...

use std::env;

use futures_util::StreamExt;
use tokio_util::compat::TokioAsyncReadCompatExt;

use fastchunking::{ChunkingStrategy, chunk_async};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        paths = vec!["Cargo.toml".to_string(), "src/lib.rs".to_string()];
    }

    println!("Processing {} files concurrently...\n", paths.len());

    // One strategy, one chunker per stream
    let strategy = ChunkingStrategy::default();

    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let strategy = strategy.clone();
            tokio::spawn(async move { process_file(path, strategy).await })
        })
        .collect();

    for handle in handles {
        let (path, chunk_count, total_bytes) = handle.await??;
        println!("{}: {} chunks, {} bytes", path, chunk_count, total_bytes);
    }

    Ok(())
}

async fn process_file(
    path: String,
    strategy: ChunkingStrategy,
) -> Result<(String, usize, usize), fastchunking::ChunkError> {
    let file = tokio::fs::File::open(&path).await?;
    let chunker = strategy.create_chunker(8 * 1024)?;
    let mut stream = chunk_async(file.compat(), chunker);

    let mut chunk_count = 0;
    let mut total_bytes = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        chunk_count += 1;
        total_bytes += chunk.len();
    }

    Ok((path, chunk_count, total_bytes))
}
