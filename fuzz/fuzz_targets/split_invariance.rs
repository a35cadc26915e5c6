#![no_main]

use libfuzzer_sys::fuzz_target;
use fastchunking::{ChunkBoundaries, ChunkingStrategy, LeveledBoundaries, split_bytes};

fuzz_target!(|input: (u16, Vec<u8>)| {
    let (split, data) = input;
    let split = usize::from(split).min(data.len());

    let strategies = [
        ChunkingStrategy::fixed(),
        ChunkingStrategy::rabin_karp(16, 0).unwrap(),
        ChunkingStrategy::rabin_karp(48, 7).unwrap(),
    ];

    for strategy in &strategies {
        for chunk_size in [1, 3, 64] {
            let whole = strategy
                .create_chunker(chunk_size)
                .unwrap()
                .next_chunk_boundaries(&data, 0);

            // Verify: cuts are strictly increasing and inside the buffer
            assert!(whole.windows(2).all(|w| w[0] < w[1]));
            assert!(whole.iter().all(|&b| b >= 1 && b <= data.len()));

            // Verify: splitting the stream does not move cuts
            let mut chunker = strategy.create_chunker(chunk_size).unwrap();
            let mut parts = chunker.next_chunk_boundaries(&data[..split], 0);
            parts.extend(
                chunker
                    .next_chunk_boundaries(&data[split..], 0)
                    .into_iter()
                    .map(|b| b + split),
            );
            assert_eq!(parts, whole);
        }

        // Verify: multi-level cuts split the same way
        let sizes = [2, 8, 32];
        let whole = strategy
            .create_multilevel_chunker(&sizes)
            .unwrap()
            .next_chunk_boundaries_levels(&data, 0);
        assert!(whole.iter().all(|&(_, level)| level < sizes.len()));

        let mut chunker = strategy.create_multilevel_chunker(&sizes).unwrap();
        let mut parts = chunker.next_chunk_boundaries_levels(&data[..split], 0);
        parts.extend(
            chunker
                .next_chunk_boundaries_levels(&data[split..], 0)
                .into_iter()
                .map(|(b, level)| (b + split, level)),
        );
        assert_eq!(parts, whole);

        // Verify: chunks cover the input exactly
        let mut chunker = strategy.create_chunker(16).unwrap();
        let chunks = split_bytes(&mut chunker, data.clone(), 0);
        let total: usize = chunks.iter().map(|c| c.len()).sum();
        assert_eq!(total, data.len());
    }
});
