//! Chunking strategies - the entry point for building chunkers.
//!
//! A [`ChunkingStrategy`] binds the algorithm parameters that are shared by
//! every chunker it creates (for Rabin-Karp: the window size and the seeded
//! character table). Chunk sizes are chosen per chunker.

use std::sync::Arc;

use tracing::debug;

use crate::cdc::{CharacterTable, RabinKarpHash};
use crate::chunker::{
    Chunker, ContentDefinedChunker, MultiLevelChunker, MultiLevelCombinator,
    MultiThresholdChunker, StaticChunker,
};
use crate::config::{RabinKarpConfig, StrategyConfig, validate_chunk_sizes};
use crate::error::ChunkError;

/// Factory for [`Chunker`]s and [`MultiLevelChunker`]s.
///
/// Cloning a strategy is cheap; the character table is shared.
///
/// # Example
///
/// ```
/// use fastchunking::{ChunkBoundaries, ChunkingStrategy, LeveledBoundaries};
///
/// let strategy = ChunkingStrategy::rabin_karp(48, 0)?;
/// let mut chunker = strategy.create_chunker(1024)?;
/// let mut multi = strategy.create_multilevel_chunker(&[256, 1024, 4096])?;
///
/// let data: Vec<u8> = (0..65536u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
/// let single = chunker.next_chunk_boundaries(&data, 0);
/// let leveled = multi.next_chunk_boundaries_levels(&data, 0);
///
/// // The 1024-byte level of the multi-level chunker cuts at least where the
/// // standalone chunker does.
/// for b in single {
///     assert!(leveled.iter().any(|&(p, level)| p == b && level >= 1));
/// }
/// # Ok::<(), fastchunking::ChunkError>(())
/// ```
#[derive(Debug, Clone)]
pub enum ChunkingStrategy {
    /// Fixed-size chunking.
    Static,

    /// Rabin-Karp content-defined chunking.
    RabinKarp(RabinKarpStrategy),
}

/// Validated Rabin-Karp parameters and the character table derived from them.
///
/// Only built by [`ChunkingStrategy`], so the table always matches
/// `config.seed()` and the window size is non-zero.
#[derive(Debug, Clone)]
pub struct RabinKarpStrategy {
    config: RabinKarpConfig,
    table: Arc<CharacterTable>,
}

impl RabinKarpStrategy {
    fn new(config: RabinKarpConfig) -> Self {
        Self {
            config,
            table: Arc::new(CharacterTable::from_seed(config.seed())),
        }
    }

    /// Returns the window size and seed.
    pub fn config(&self) -> RabinKarpConfig {
        self.config
    }

    /// Returns the character table shared by every chunker of this strategy.
    pub fn table(&self) -> &Arc<CharacterTable> {
        &self.table
    }

    fn engine(&self) -> Result<RabinKarpHash, ChunkError> {
        RabinKarpHash::with_table(self.config.window_size(), Arc::clone(&self.table))
    }
}

impl ChunkingStrategy {
    /// Returns the static chunking strategy.
    pub fn fixed() -> Self {
        ChunkingStrategy::Static
    }

    /// Returns a Rabin-Karp strategy with the given window size and seed.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `window_size` is zero.
    pub fn rabin_karp(window_size: usize, seed: u32) -> Result<Self, ChunkError> {
        Self::from_config(StrategyConfig::RabinKarp(RabinKarpConfig::new(
            window_size,
            seed,
        )?))
    }

    /// Builds a strategy from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if the configuration is invalid.
    pub fn from_config(config: StrategyConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(match config {
            StrategyConfig::Static => ChunkingStrategy::Static,
            StrategyConfig::RabinKarp(config) => {
                ChunkingStrategy::RabinKarp(RabinKarpStrategy::new(config))
            }
        })
    }

    /// Returns the configuration this strategy was built from.
    pub fn config(&self) -> StrategyConfig {
        match self {
            ChunkingStrategy::Static => StrategyConfig::Static,
            ChunkingStrategy::RabinKarp(rk) => StrategyConfig::RabinKarp(rk.config()),
        }
    }

    /// Returns the number of bytes of context a cut decision depends on.
    ///
    /// This is also the lead-in a caller passes as `prepend_bytes` so that
    /// the first chunk of a stream may be shorter than the window.
    pub fn window_size(&self) -> usize {
        match self {
            ChunkingStrategy::Static => 1,
            ChunkingStrategy::RabinKarp(rk) => rk.config().window_size(),
        }
    }

    /// Creates a chunker targeting `chunk_size` bytes per chunk.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `chunk_size` is zero.
    pub fn create_chunker(&self, chunk_size: usize) -> Result<Chunker, ChunkError> {
        let chunker = match self {
            ChunkingStrategy::Static => Chunker::Static(StaticChunker::new(chunk_size)?),
            ChunkingStrategy::RabinKarp(rk) => {
                Chunker::RabinKarp(ContentDefinedChunker::new(rk.engine()?, chunk_size)?)
            }
        };

        debug!(
            algorithm = self.name(),
            chunk_size,
            window_size = self.window_size(),
            "created chunker"
        );
        Ok(chunker)
    }

    /// Creates a chunker with one level per entry of `chunk_sizes`.
    ///
    /// `chunk_sizes` should be ascending so that a higher level means larger
    /// chunks; this is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if `chunk_sizes` is empty or
    /// contains a zero.
    pub fn create_multilevel_chunker(
        &self,
        chunk_sizes: &[usize],
    ) -> Result<MultiLevelChunker, ChunkError> {
        validate_chunk_sizes(chunk_sizes)?;

        let chunker = match self {
            ChunkingStrategy::Static => {
                let children = chunk_sizes
                    .iter()
                    .map(|&size| StaticChunker::new(size))
                    .collect::<Result<Vec<_>, _>>()?;
                MultiLevelChunker::Static(MultiLevelCombinator::new(children)?)
            }
            ChunkingStrategy::RabinKarp(rk) => MultiLevelChunker::RabinKarp(
                MultiThresholdChunker::new(rk.engine()?, chunk_sizes)?,
            ),
        };

        debug!(
            algorithm = self.name(),
            ?chunk_sizes,
            window_size = self.window_size(),
            "created multi-level chunker"
        );
        Ok(chunker)
    }

    fn name(&self) -> &'static str {
        match self {
            ChunkingStrategy::Static => "static",
            ChunkingStrategy::RabinKarp(_) => "rabin-karp",
        }
    }
}

impl Default for ChunkingStrategy {
    fn default() -> Self {
        ChunkingStrategy::RabinKarp(RabinKarpStrategy::new(RabinKarpConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::{ChunkBoundaries, LeveledBoundaries};
    use crate::config::{DEFAULT_SEED, DEFAULT_WINDOW_SIZE};

    #[test]
    fn test_window_size() {
        assert_eq!(ChunkingStrategy::fixed().window_size(), 1);
        assert_eq!(ChunkingStrategy::rabin_karp(32, 7).unwrap().window_size(), 32);
        assert_eq!(ChunkingStrategy::default().window_size(), DEFAULT_WINDOW_SIZE);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(ChunkingStrategy::rabin_karp(0, 0).is_err());

        for strategy in [ChunkingStrategy::fixed(), ChunkingStrategy::default()] {
            assert!(strategy.create_chunker(0).is_err());
            assert!(strategy.create_multilevel_chunker(&[]).is_err());
            assert!(strategy.create_multilevel_chunker(&[4, 0]).is_err());
        }
    }

    #[test]
    fn test_config_round_trip() {
        let strategy = ChunkingStrategy::rabin_karp(64, 9).unwrap();
        let StrategyConfig::RabinKarp(config) = strategy.config() else {
            panic!("expected rabin-karp config");
        };
        assert_eq!(config.window_size(), 64);
        assert_eq!(config.seed(), 9);

        assert_eq!(ChunkingStrategy::fixed().config(), StrategyConfig::Static);
        assert!(matches!(
            ChunkingStrategy::default().config(),
            StrategyConfig::RabinKarp(c) if c.seed() == DEFAULT_SEED
        ));
    }

    #[test]
    fn test_static_chunkers() {
        let strategy = ChunkingStrategy::fixed();
        let mut chunker = strategy.create_chunker(3).unwrap();
        assert!(matches!(chunker, Chunker::Static(_)));
        assert_eq!(chunker.chunk_size(), 3);
        assert_eq!(chunker.next_chunk_boundaries(&[0u8; 7], 0), vec![3, 6]);

        let mut multi = strategy.create_multilevel_chunker(&[5, 10]).unwrap();
        assert!(matches!(multi, MultiLevelChunker::Static(_)));
        assert_eq!(multi.level_count(), 2);
        assert_eq!(
            multi.next_chunk_boundaries_levels(&[0u8; 20], 0),
            vec![(5, 0), (10, 1), (15, 0), (20, 1)]
        );
    }

    #[test]
    fn test_rabin_karp_chunkers_share_table() {
        let strategy = ChunkingStrategy::rabin_karp(48, 3).unwrap();
        let Chunker::RabinKarp(a) = strategy.create_chunker(64).unwrap() else {
            panic!("expected rabin-karp chunker");
        };
        let MultiLevelChunker::RabinKarp(b) = strategy.create_multilevel_chunker(&[64]).unwrap()
        else {
            panic!("expected rabin-karp chunker");
        };
        assert!(Arc::ptr_eq(a.engine().table(), b.engine().table()));
    }

    #[test]
    fn test_table_matches_seed() {
        for (window_size, seed) in [(48, 0), (16, 12345)] {
            let strategy = ChunkingStrategy::rabin_karp(window_size, seed).unwrap();
            let ChunkingStrategy::RabinKarp(rk) = &strategy else {
                panic!("expected rabin-karp strategy");
            };
            assert_eq!(rk.config().window_size(), window_size);
            assert_eq!(**rk.table(), CharacterTable::from_seed(seed));
        }

        let ChunkingStrategy::RabinKarp(rk) = ChunkingStrategy::default() else {
            panic!("expected rabin-karp strategy");
        };
        assert_eq!(**rk.table(), CharacterTable::from_seed(DEFAULT_SEED));
    }

    #[test]
    fn test_zero_window_config_rejected() {
        let config = RabinKarpConfig::default().with_window_size(0);
        assert!(ChunkingStrategy::from_config(StrategyConfig::RabinKarp(config)).is_err());
    }

    #[test]
    fn test_chunkers_are_independent() {
        let strategy = ChunkingStrategy::default();
        let data: Vec<u8> = (0..20_000u32)
            .map(|i| (i.wrapping_mul(2654435761) >> 11) as u8)
            .collect();

        let mut a = strategy.create_chunker(128).unwrap();
        let mut b = strategy.create_chunker(128).unwrap();
        a.next_chunk_boundaries(&data[..5_000], 0);

        let fresh = b.next_chunk_boundaries(&data, 0);
        let mut c = strategy.create_chunker(128).unwrap();
        assert_eq!(c.next_chunk_boundaries(&data, 0), fresh);
    }

    #[test]
    fn test_same_seed_same_cuts() {
        let data: Vec<u8> = (0..20_000u32)
            .map(|i| (i.wrapping_mul(2246822519) >> 7) as u8)
            .collect();
        let cuts = |seed| {
            ChunkingStrategy::rabin_karp(48, seed)
                .unwrap()
                .create_chunker(64)
                .unwrap()
                .next_chunk_boundaries(&data, 0)
        };
        assert_eq!(cuts(1), cuts(1));
        assert_ne!(cuts(1), cuts(2));
    }
}
