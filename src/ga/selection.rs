//! Parent selection.
//!
//! Selection determines which nets of a split are chosen as parents for
//! crossover. Different strategies provide different selection pressure.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

/// Selection strategy for choosing parents.
///
/// All strategies **maximize**: a higher fitness is better.
///
/// # Examples
///
/// ```
/// use genminer::ga::Selection;
/// use rand::SeedableRng;
///
/// let fitness = [0.1, 0.9, 0.4];
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
///
/// // A tournament as large as the population nearly always finds the best
/// let idx = Selection::Tournament(8).select(&fitness, &mut rng);
/// assert!(idx < fitness.len());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Tournament selection: pick `k` nets at random, keep the fittest.
    ///
    /// Higher `k` = stronger selection pressure.
    /// - k=2: light pressure
    /// - k=3-5: moderate pressure (typical default)
    /// - k>5: strong pressure (risk of premature convergence)
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Fitness can be negative, so weights are shifted by the split's
    /// minimum before drawing.
    Roulette,

    /// Linear rank selection: the fittest of `n` nets gets weight `n`, the
    /// least fit gets weight 1.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Select a parent index given the fitness of every candidate.
    ///
    /// # Panics
    /// Panics if `fitness` is empty.
    pub fn select<R: Rng>(&self, fitness: &[f64], rng: &mut R) -> usize {
        assert!(!fitness.is_empty(), "cannot select from empty population");

        match self {
            Selection::Tournament(k) => tournament(fitness, *k, rng),
            Selection::Roulette => roulette(fitness, rng),
            Selection::Rank => rank(fitness, rng),
        }
    }
}

fn tournament<R: Rng>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = fitness.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if fitness[idx] > fitness[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}

/// weight_i = fitness_i - min_fitness + epsilon
fn roulette<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    let min_fitness = fitness.iter().cloned().fold(f64::INFINITY, f64::min);
    let epsilon = 1e-10;

    let weights: Vec<f64> = fitness
        .iter()
        .map(|&f| {
            let w = f - min_fitness + epsilon;
            if w > 0.0 {
                w
            } else {
                epsilon
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

fn rank<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    // best first
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        fitness[b]
            .partial_cmp(&fitness[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (rank, &original_idx) in order.iter().enumerate() {
        cumulative += (n - rank) as f64;
        if cumulative > threshold {
            return original_idx;
        }
    }

    order[n - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn counts(selection: Selection, fitness: &[f64]) -> Vec<u32> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = vec![0u32; fitness.len()];
        for _ in 0..10_000 {
            counts[selection.select(fitness, &mut rng)] += 1;
        }
        counts
    }

    #[test]
    fn test_tournament_favors_best() {
        let c = counts(Selection::Tournament(4), &[0.1, 0.5, 0.95, 0.2]);
        assert!(c[2] > 6000, "expected best >60% of the time, got {c:?}");
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let c = counts(Selection::Tournament(1), &[0.1, 0.5, 0.95, 0.2]);
        for &n in &c {
            assert!(n > 1500, "expected uniform, got counts: {c:?}");
        }
    }

    #[test]
    fn test_roulette_favors_best() {
        let c = counts(Selection::Roulette, &[-1.0, 0.0, 0.9, 0.3]);
        assert!(c[2] > c[0], "best should be selected more often: {c:?}");
    }

    #[test]
    fn test_rank_favors_best() {
        let c = counts(Selection::Rank, &[-1.0, 0.0, 0.9, 0.3]);
        assert!(c[2] > c[0], "best should be selected more: {c:?}");
    }

    #[test]
    fn test_single_candidate() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(Selection::Tournament(3).select(&[0.5], &mut rng), 0);
        assert_eq!(Selection::Roulette.select(&[0.5], &mut rng), 0);
        assert_eq!(Selection::Rank.select(&[0.5], &mut rng), 0);
    }

    #[test]
    fn test_equal_fitness_is_uniform() {
        let c = counts(Selection::Roulette, &[0.5, 0.5, 0.5, 0.5]);
        for &n in &c {
            assert!(n > 1500, "expected roughly uniform, got {c:?}");
        }
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let mut rng = StdRng::seed_from_u64(42);
        Selection::Tournament(3).select(&[], &mut rng);
    }
}
