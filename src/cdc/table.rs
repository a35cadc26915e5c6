//! Seeded character table for the Rabin-Karp hash.
//!
//! Each byte value maps to a pseudo-random 29-bit word. The words are read
//! from the BLAKE3 extendable output in key-derivation mode, keyed by the
//! little-endian seed, so a seed always yields the same table and different
//! seeds yield unrelated ones.

use super::rabinkarp::HASH_MASK;

const TABLE_CONTEXT: &str = "fastchunking 2024 rabin-karp character table";

/// Per-byte hash words, one for each of the 256 byte values.
#[derive(Clone, PartialEq, Eq)]
pub struct CharacterTable {
    values: [u32; 256],
}

impl CharacterTable {
    /// Derives the table for `seed`.
    pub fn from_seed(seed: u32) -> Self {
        let mut hasher = blake3::Hasher::new_derive_key(TABLE_CONTEXT);
        hasher.update(&seed.to_le_bytes());

        let mut bytes = [0u8; 256 * 4];
        hasher.finalize_xof().fill(&mut bytes);

        let mut values = [0u32; 256];
        for (value, word) in values.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = u32::from_le_bytes([word[0], word[1], word[2], word[3]]) & HASH_MASK;
        }

        Self { values }
    }

    /// Returns the word for `byte`.
    #[inline]
    pub fn get(&self, byte: u8) -> u32 {
        self.values[byte as usize]
    }
}

impl std::fmt::Debug for CharacterTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterTable")
            .field("first", &self.values[0])
            .field("last", &self.values[255])
            .finish_non_exhaustive()
    }
}
