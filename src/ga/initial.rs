//! Initial population from dependency measures.

use super::operators::random_partition;
use super::types::InitialPopulationBuilder;
use crate::log::{ActivityMapping, EventLog};
use crate::net::HeuristicsNet;
use rand::Rng;
use tracing::debug;

/// Directly-follows dependency measures between activities.
///
/// For `a ≠ b`, with `|a > b|` the number of times an event of `a` is
/// directly followed by an event of `b`:
///
/// ```text
/// D(a, b) = (|a > b| - |b > a|) / (|a > b| + |b > a| + 1)
/// D(a, a) = |a > a| / (|a > a| + 1)
/// ```
///
/// When a class is duplicated, every activity of the class is credited with
/// the class's successions.
///
/// # References
///
/// - Weijters & van der Aalst (2003), "Rediscovering workflow models from
///   event-based data using little thumb"
#[derive(Debug, Clone)]
pub struct DependencyMatrix {
    n: usize,
    follows: Vec<u64>,
}

impl DependencyMatrix {
    pub fn from_log(log: &EventLog, mapping: &ActivityMapping) -> Self {
        let n = mapping.len();
        let mut follows = vec![0u64; n * n];

        for trace in log.iter() {
            let activities: Vec<_> = trace
                .events
                .iter()
                .map(|e| mapping.activities_for(&e.class()))
                .collect();
            for pair in activities.windows(2) {
                if let (Some(from), Some(to)) = (pair[0], pair[1]) {
                    for a in from.iter() {
                        for b in to.iter() {
                            follows[a * n + b] += 1;
                        }
                    }
                }
            }
        }

        Self { n, follows }
    }

    pub fn activity_count(&self) -> usize {
        self.n
    }

    /// Number of times `a` is directly followed by `b`.
    pub fn follows(&self, a: usize, b: usize) -> u64 {
        self.follows[a * self.n + b]
    }

    /// Dependency measure in `(-1, 1)`.
    pub fn dependency(&self, a: usize, b: usize) -> f64 {
        let ab = self.follows(a, b) as f64;
        if a == b {
            return ab / (ab + 1.0);
        }
        let ba = self.follows(b, a) as f64;
        (ab - ba) / (ab + ba + 1.0)
    }
}

/// Builds nets whose arcs are drawn from the log's dependency measures.
///
/// Each candidate arc `a → b` with a positive dependency is included with
/// probability `D(a, b)^power`, so higher powers yield sparser nets. The
/// arcs of every activity are then split into random AND/OR groups on both
/// sides.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicInitialPopulation;

impl HeuristicInitialPopulation {
    pub fn new() -> Self {
        Self
    }

    fn build_one<R: Rng>(matrix: &DependencyMatrix, power: i32, rng: &mut R) -> HeuristicsNet {
        let n = matrix.activity_count();
        let mut net = HeuristicsNet::new(n);

        for a in 0..n {
            for b in 0..n {
                let d = matrix.dependency(a, b);
                if d > 0.0 && rng.random::<f64>() < d.powi(power) {
                    net.add_arc(a, b);
                }
            }
        }

        for a in 0..n {
            let inputs = random_partition(&net.inputs(a).union(), rng);
            net.set_inputs(a, inputs);
            let outputs = random_partition(&net.outputs(a).union(), rng);
            net.set_outputs(a, outputs);
        }
        net
    }
}

impl InitialPopulationBuilder for HeuristicInitialPopulation {
    fn build<R: Rng>(
        &self,
        size: usize,
        log: &EventLog,
        mapping: &ActivityMapping,
        power: i32,
        rng: &mut R,
    ) -> Vec<HeuristicsNet> {
        let matrix = DependencyMatrix::from_log(log, mapping);
        debug!(activities = matrix.activity_count(), size, power, "building initial population");
        (0..size)
            .map(|_| Self::build_one(&matrix, power, rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Trace;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn log(traces: &[&[&str]]) -> (EventLog, ActivityMapping) {
        let log = EventLog::new(traces.iter().map(|t| Trace::from_names(*t)).collect());
        let mapping = ActivityMapping::new(&log.event_classes());
        (log, mapping)
    }

    // ---- Dependency matrix ----

    #[test]
    fn test_dependency_of_sequence() {
        let (log, mapping) = log(&[&["a", "b", "c"], &["a", "b", "c"], &["a", "b", "c"]]);
        let m = DependencyMatrix::from_log(&log, &mapping);
        assert_eq!(m.follows(0, 1), 3);
        assert!((m.dependency(0, 1) - 0.75).abs() < 1e-12);
        assert!((m.dependency(1, 0) + 0.75).abs() < 1e-12);
        assert_eq!(m.dependency(0, 2), 0.0);
    }

    #[test]
    fn test_dependency_of_self_loop() {
        let (log, mapping) = log(&[&["a", "a", "b"]]);
        let m = DependencyMatrix::from_log(&log, &mapping);
        assert!((m.dependency(0, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_pair_cancels_out() {
        let (log, mapping) = log(&[&["a", "b"], &["b", "a"]]);
        let m = DependencyMatrix::from_log(&log, &mapping);
        assert_eq!(m.dependency(0, 1), 0.0);
    }

    // ---- Builder ----

    #[test]
    fn test_builds_requested_size() {
        let (log, mapping) = log(&[&["a", "b", "c"], &["a", "c"]]);
        let mut rng = StdRng::seed_from_u64(42);
        let pop = HeuristicInitialPopulation.build(25, &log, &mapping, 1, &mut rng);
        assert_eq!(pop.len(), 25);
        assert!(pop.iter().all(|n| n.activity_count() == 3));
        assert!(pop.iter().all(|n| n.fitness().is_none()));
    }

    #[test]
    fn test_only_positive_dependencies_become_arcs() {
        let sequence: &[&str] = &["a", "b", "c"];
        let (log, mapping) = log(&[sequence; 5]);
        let mut rng = StdRng::seed_from_u64(1);
        let pop = HeuristicInitialPopulation.build(50, &log, &mapping, 1, &mut rng);
        for net in &pop {
            assert!(!net.has_arc(1, 0));
            assert!(!net.has_arc(2, 1));
            assert!(!net.has_arc(0, 2));
            for a in 0..3 {
                for b in 0..3 {
                    assert_eq!(net.has_arc(a, b), net.inputs(b).contains_element(a));
                }
            }
        }
        assert!(pop.iter().any(|n| n.has_arc(0, 1)));
    }

    #[test]
    fn test_same_seed_same_population() {
        let (log, mapping) = log(&[&["a", "b", "c", "d"], &["a", "c", "b", "d"]]);
        let build = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            HeuristicInitialPopulation.build(10, &log, &mapping, 1, &mut rng)
        };
        assert_eq!(build(9), build(9));
    }
}
