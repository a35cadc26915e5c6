#![no_main]

use libfuzzer_sys::fuzz_target;
use fastchunking::{ChunkBoundaries, ChunkingStrategy};

fuzz_target!(|input: (u8, Vec<u8>)| {
    let (k, data) = input;
    let k = usize::from(k);

    let mut padded = vec![0u8; k];
    padded.extend_from_slice(&data);

    let strategies = [
        ChunkingStrategy::fixed(),
        ChunkingStrategy::rabin_karp(32, 0).unwrap(),
    ];

    for strategy in &strategies {
        for chunk_size in [1, 5, 64] {
            // Verify: a lead-in of k zeros matches k real zero bytes
            let reference: Vec<usize> = strategy
                .create_chunker(chunk_size)
                .unwrap()
                .next_chunk_boundaries(&padded, 0)
                .into_iter()
                .filter(|&b| b > k)
                .collect();
            let with_lead_in: Vec<usize> = strategy
                .create_chunker(chunk_size)
                .unwrap()
                .next_chunk_boundaries(&data, k)
                .into_iter()
                .map(|b| b + k)
                .collect();
            assert_eq!(reference, with_lead_in);
        }
    }
});
