//! Split assignment and per-stage seeding.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of splits a population is shuffled into.
///
/// `population / (partitions * batch)`, never less than one.
///
/// ```
/// use genminer::pipeline::split_count;
///
/// assert_eq!(split_count(600, 4, 50), 3);
/// assert_eq!(split_count(100, 4, 50), 1);
/// ```
pub fn split_count(population: usize, partitions: usize, batch: usize) -> usize {
    let per_split = partitions.saturating_mul(batch).max(1);
    (population / per_split).max(1)
}

/// Pipeline stage a seed is derived for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Initial,
    Evaluate,
    Recombine,
}

impl Stage {
    fn tag(self) -> u64 {
        match self {
            Stage::Initial => 0x01,
            Stage::Evaluate => 0x02,
            Stage::Recombine => 0x03,
        }
    }
}

/// SplitMix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derives the seed of one worker of one stage of one generation.
///
/// Every (stage, generation, worker) triple gets an independent stream, so
/// re-running a stage reproduces its random choices no matter which stages
/// ran before it in the same process.
pub fn stage_seed(run_seed: u64, stage: Stage, generation: usize, worker: usize) -> u64 {
    let mut h = mix(run_seed);
    h = mix(h ^ stage.tag());
    h = mix(h ^ generation as u64);
    mix(h ^ worker as u64)
}

/// Draws a split index for each evaluated net.
///
/// Uniform over `[0, splits)` and reproducible for a fixed seed and call
/// sequence. Assignment is random, not balanced.
#[derive(Debug, Clone)]
pub struct SplitAssigner {
    splits: usize,
    rng: StdRng,
}

impl SplitAssigner {
    /// # Panics
    /// Panics if `splits` is zero.
    pub fn new(splits: usize, seed: u64) -> Self {
        assert!(splits > 0, "split count must be positive");
        Self {
            splits,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn splits(&self) -> usize {
        self.splits
    }

    pub fn assign(&mut self) -> usize {
        self.rng.random_range(0..self.splits)
    }
}
