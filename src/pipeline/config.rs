//! Miner configuration.
//!
//! [`MinerConfig`] holds every parameter of a mining run: population and
//! pipeline shape, operator rates, parallelism and reproducibility.

use super::split::split_count;
use crate::ga::Selection;

/// Smallest population the pipeline accepts.
pub const MIN_POPULATION_SIZE: usize = 600;

/// Configuration for a genetic mining run.
///
/// # Defaults
///
/// ```
/// use genminer::pipeline::MinerConfig;
///
/// let config = MinerConfig::default();
/// assert_eq!(config.population_size, 600);
/// assert_eq!(config.partition_count, 4);
/// assert_eq!(config.split_count(), 3);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use genminer::ga::Selection;
/// use genminer::pipeline::MinerConfig;
///
/// let config = MinerConfig::default()
///     .with_population_size(1200)
///     .with_generations(50)
///     .with_selection(Selection::Rank)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// Number of nets per generation. At least [`MIN_POPULATION_SIZE`].
    pub population_size: usize,

    /// Number of generations evolved after generation 0.
    pub generations: usize,

    /// Number of physically separate partitions per stored generation.
    pub partition_count: usize,

    /// Target number of nets recombined together per partition.
    ///
    /// Together with `partition_count` this fixes the number of splits:
    /// `population_size / (partition_count * batch_per_partition)`.
    pub batch_per_partition: usize,

    /// Maximum size of the final result set.
    pub result_size: usize,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Fraction of each split preserved as elites (0.0–1.0).
    pub elite_ratio: f64,

    /// Probability of applying crossover to a pair of parents (0.0–1.0).
    pub crossover_rate: f64,

    /// Probability of mutating each activity of an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Exponent applied to dependency measures when building generation 0.
    pub power: i32,

    /// Whether to evaluate and recombine in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Continue from the last committed generation in the store instead of
    /// starting over.
    pub resume: bool,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            population_size: MIN_POPULATION_SIZE,
            generations: 10,
            partition_count: 4,
            batch_per_partition: 50,
            result_size: 100,
            selection: Selection::default(),
            elite_ratio: 0.2,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            power: 1,
            parallel: true,
            seed: None,
            resume: false,
        }
    }
}

impl MinerConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the number of partitions per generation.
    pub fn with_partition_count(mut self, n: usize) -> Self {
        self.partition_count = n;
        self
    }

    /// Sets the per-partition batch size used to derive the split count.
    pub fn with_batch_per_partition(mut self, n: usize) -> Self {
        self.batch_per_partition = n;
        self
    }

    /// Sets the maximum size of the result set.
    pub fn with_result_size(mut self, n: usize) -> Self {
        self.result_size = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the dependency exponent for generation 0.
    pub fn with_power(mut self, power: i32) -> Self {
        self.power = power;
        self
    }

    /// Enables or disables parallel workers.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables resuming from the store.
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Number of splits each generation is shuffled into.
    pub fn split_count(&self) -> usize {
        split_count(
            self.population_size,
            self.partition_count,
            self.batch_per_partition,
        )
    }

    /// Number of nets in the final result set.
    pub fn result_limit(&self) -> usize {
        self.result_size.min(self.population_size)
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < MIN_POPULATION_SIZE {
            return Err(format!(
                "population_size must be at least {MIN_POPULATION_SIZE}, got {}",
                self.population_size
            ));
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        if self.partition_count == 0 {
            return Err("partition_count must be at least 1".into());
        }
        if self.batch_per_partition == 0 {
            return Err("batch_per_partition must be at least 1".into());
        }
        if self.result_size == 0 {
            return Err("result_size must be at least 1".into());
        }
        if self.power < 1 {
            return Err("power must be at least 1".into());
        }
        for (name, rate) in [
            ("elite_ratio", self.elite_ratio),
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("{name} must be within [0, 1], got {rate}"));
            }
        }
        if self.elite_ratio >= 1.0 {
            return Err("elite_ratio too high: elites fill entire population".into());
        }
        Ok(())
    }
}
