//! Heuristics net individual.

use crate::arcs::{IndexSetCollection, OrderedIndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate process model: one individual of the population.
///
/// Every activity `a` has an input and an output [`IndexSetCollection`].
/// An arc `a → b` exists when `b` appears in the outputs of `a` and `a` in
/// the inputs of `b`; the operators keep both sides consistent through
/// [`add_arc`](Self::add_arc), [`remove_arc`](Self::remove_arc) and
/// [`reconcile`](Self::reconcile).
///
/// The `key` identifies the individual's position in the initial
/// population and survives recombination. Fitness is `None` until the net
/// has been evaluated. Firing and arc-usage counters belong to a single
/// evaluation and are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicsNet {
    key: usize,
    fitness: Option<f64>,
    inputs: Vec<IndexSetCollection>,
    outputs: Vec<IndexSetCollection>,
    #[serde(skip)]
    firings: Vec<u64>,
    #[serde(skip)]
    arc_usage: Vec<u64>,
}

impl HeuristicsNet {
    /// Creates a net with `activity_count` unconnected activities.
    pub fn new(activity_count: usize) -> Self {
        Self {
            key: 0,
            fitness: None,
            inputs: vec![IndexSetCollection::new(); activity_count],
            outputs: vec![IndexSetCollection::new(); activity_count],
            firings: Vec::new(),
            arc_usage: Vec::new(),
        }
    }

    pub fn key(&self) -> usize {
        self.key
    }

    pub fn set_key(&mut self, key: usize) {
        self.key = key;
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Marks the fitness as stale.
    pub fn clear_fitness(&mut self) {
        self.fitness = None;
    }

    pub fn activity_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn inputs(&self, activity: usize) -> &IndexSetCollection {
        &self.inputs[activity]
    }

    pub fn outputs(&self, activity: usize) -> &IndexSetCollection {
        &self.outputs[activity]
    }

    /// Replaces the input collection of `activity` without touching the
    /// other side. Call [`reconcile`](Self::reconcile) afterwards.
    pub fn set_inputs(&mut self, activity: usize, inputs: IndexSetCollection) {
        self.inputs[activity] = inputs;
    }

    /// Replaces the output collection of `activity` without touching the
    /// other side. Call [`reconcile`](Self::reconcile) afterwards.
    pub fn set_outputs(&mut self, activity: usize, outputs: IndexSetCollection) {
        self.outputs[activity] = outputs;
    }

    pub fn has_arc(&self, from: usize, to: usize) -> bool {
        self.outputs[from].contains_element(to)
    }

    /// Adds the arc `from → to` as a new singleton group on both sides,
    /// unless the element is already present on that side.
    pub fn add_arc(&mut self, from: usize, to: usize) {
        if !self.outputs[from].contains_element(to) {
            self.outputs[from].add(OrderedIndexSet::singleton(to));
        }
        if !self.inputs[to].contains_element(from) {
            self.inputs[to].add(OrderedIndexSet::singleton(from));
        }
    }

    /// Removes the arc `from → to` from both sides.
    pub fn remove_arc(&mut self, from: usize, to: usize) {
        self.outputs[from] = self.outputs[from].without_element(to);
        self.inputs[to] = self.inputs[to].without_element(from);
    }

    /// Makes every other activity agree with the arc sets of `activity`.
    ///
    /// The sets of `activity` are taken as authoritative: neighbours gain a
    /// singleton group for arcs they are missing and lose elements for arcs
    /// `activity` no longer has.
    pub fn reconcile(&mut self, activity: usize) {
        let successors = self.outputs[activity].union();
        let predecessors = self.inputs[activity].union();

        for other in 0..self.activity_count() {
            let wants_input = successors.contains(other);
            if wants_input && !self.inputs[other].contains_element(activity) {
                self.inputs[other].add(OrderedIndexSet::singleton(activity));
            } else if !wants_input && self.inputs[other].contains_element(activity) {
                self.inputs[other] = self.inputs[other].without_element(activity);
            }

            let wants_output = predecessors.contains(other);
            if wants_output && !self.outputs[other].contains_element(activity) {
                self.outputs[other].add(OrderedIndexSet::singleton(activity));
            } else if !wants_output && self.outputs[other].contains_element(activity) {
                self.outputs[other] = self.outputs[other].without_element(activity);
            }
        }
    }

    /// Activities with no input groups.
    pub fn start_activities(&self) -> OrderedIndexSet {
        (0..self.activity_count())
            .filter(|&a| self.inputs[a].is_empty())
            .collect()
    }

    /// Activities with no output groups.
    pub fn end_activities(&self) -> OrderedIndexSet {
        (0..self.activity_count())
            .filter(|&a| self.outputs[a].is_empty())
            .collect()
    }

    /// Number of distinct arcs.
    pub fn arc_count(&self) -> usize {
        self.outputs.iter().map(|o| o.union().len()).sum()
    }

    /// Zeroes the firing and arc-usage counters.
    pub fn reset_usage(&mut self) {
        let n = self.activity_count();
        self.firings = vec![0; n];
        self.arc_usage = vec![0; n * n];
    }

    pub fn record_firing(&mut self, activity: usize) {
        if let Some(count) = self.firings.get_mut(activity) {
            *count += 1;
        }
    }

    pub fn record_arc_usage(&mut self, from: usize, to: usize) {
        let n = self.activity_count();
        if let Some(count) = self.arc_usage.get_mut(from * n + to) {
            *count += 1;
        }
    }

    pub fn firings(&self, activity: usize) -> u64 {
        self.firings.get(activity).copied().unwrap_or(0)
    }

    pub fn arc_usage(&self, from: usize, to: usize) -> u64 {
        self.arc_usage
            .get(from * self.activity_count() + to)
            .copied()
            .unwrap_or(0)
    }
}

/// Structural equality: key, fitness and arc sets. Usage counters are
/// evaluation scratch space and do not participate.
impl PartialEq for HeuristicsNet {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.fitness == other.fitness
            && self.inputs == other.inputs
            && self.outputs == other.outputs
    }
}

impl fmt::Display for HeuristicsNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fitness {
            Some(fitness) => writeln!(f, "net #{} fitness={fitness:.6}", self.key)?,
            None => writeln!(f, "net #{} fitness=?", self.key)?,
        }
        for a in 0..self.activity_count() {
            writeln!(f, "  {a}: in={} out={}", self.inputs[a], self.outputs[a])?;
        }
        Ok(())
    }
}
