//! Next-generation builder: elitism, selection, crossover, mutation.

use super::operators::{mutate, segment_crossover};
use super::selection::Selection;
use super::types::PopulationBuilder;
use crate::net::HeuristicsNet;
use crate::pipeline::MinerConfig;
use rand::Rng;
use std::cmp::Ordering;

/// Default [`PopulationBuilder`].
///
/// The fittest `elite_ratio` share of the split is copied unchanged; the
/// rest is bred from parents chosen by `selection`, crossed over with
/// probability `crossover_rate` and mutated per activity with probability
/// `mutation_rate`.
///
/// Nets without a fitness rank below every evaluated net.
///
/// # Examples
///
/// ```
/// use genminer::ga::{NextPopulation, PopulationBuilder, Selection};
/// use genminer::net::HeuristicsNet;
/// use rand::SeedableRng;
///
/// let builder = NextPopulation::new(Selection::Tournament(2), 0.25, 0.8, 0.2);
/// let population: Vec<HeuristicsNet> = (0..8)
///     .map(|i| {
///         let mut net = HeuristicsNet::new(3);
///         net.set_fitness(i as f64 / 8.0);
///         net
///     })
///     .collect();
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(3);
/// let next = builder.build(population, &mut rng);
/// assert_eq!(next.len(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextPopulation {
    selection: Selection,
    elite_ratio: f64,
    crossover_rate: f64,
    mutation_rate: f64,
}

impl Default for NextPopulation {
    fn default() -> Self {
        Self::from_config(&MinerConfig::default())
    }
}

impl NextPopulation {
    pub fn new(
        selection: Selection,
        elite_ratio: f64,
        crossover_rate: f64,
        mutation_rate: f64,
    ) -> Self {
        Self {
            selection,
            elite_ratio,
            crossover_rate,
            mutation_rate,
        }
    }

    pub fn from_config(config: &MinerConfig) -> Self {
        Self::new(
            config.selection,
            config.elite_ratio,
            config.crossover_rate,
            config.mutation_rate,
        )
    }
}

impl PopulationBuilder for NextPopulation {
    fn build<R: Rng>(&self, population: Vec<HeuristicsNet>, rng: &mut R) -> Vec<HeuristicsNet> {
        let size = population.len();
        if size == 0 {
            return population;
        }

        let floor = population
            .iter()
            .filter_map(HeuristicsNet::fitness)
            .fold(f64::INFINITY, f64::min);
        let floor = if floor.is_finite() { floor } else { 0.0 };
        let fitness: Vec<f64> = population
            .iter()
            .map(|net| net.fitness().unwrap_or(floor))
            .collect();

        // best first, unevaluated last
        let mut order: Vec<usize> = (0..size).collect();
        order.sort_by(
            |&a, &b| match (population[a].fitness(), population[b].fitness()) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        );

        let elite_count = ((size as f64 * self.elite_ratio) as usize).min(size);
        let mut next: Vec<HeuristicsNet> = order[..elite_count]
            .iter()
            .map(|&i| population[i].clone())
            .collect();

        while next.len() < size {
            let p1 = &population[self.selection.select(&fitness, rng)];
            let p2 = &population[self.selection.select(&fitness, rng)];

            let children = if rng.random_range(0.0..1.0) < self.crossover_rate {
                let (c1, c2) = segment_crossover(p1, p2, rng);
                vec![c1, c2]
            } else {
                vec![p1.clone()]
            };

            for mut child in children {
                if next.len() >= size {
                    break;
                }
                mutate(&mut child, self.mutation_rate, rng);
                next.push(child);
            }
        }

        next
    }
}
