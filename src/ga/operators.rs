//! Genetic operators on heuristics nets.
//!
//! Operators work on activity indices and keep every arc consistent on both
//! sides (outputs of the source, inputs of the target).
//!
//! # Crossover Operators
//!
//! - [`segment_crossover`]: exchange the arc sets of a random run of
//!   activities between two parents, then repair the neighbours
//!
//! # Mutation Operators
//!
//! - [`mutate`]: per activity, with a given probability, add an arc, remove
//!   an arc or regroup one side's arcs into new AND/OR groups
//!
//! # References
//!
//! - de Medeiros, Weijters & van der Aalst (2007), "Genetic process mining:
//!   an experimental evaluation", *Data Mining and Knowledge Discovery*
//!   14(2), 245-304

use crate::arcs::{IndexSetCollection, OrderedIndexSet};
use crate::net::HeuristicsNet;
use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Segment crossover for heuristics nets.
///
/// # Algorithm
///
/// 1. Select a random segment `[start, end]` of activity indices
/// 2. For every activity in the segment, child1 takes the input and output
///    collections of parent2 and child2 those of parent1
/// 3. Reconcile each swapped activity so that its neighbours agree with the
///    arc sets it received
///
/// Both children lose their fitness.
///
/// # Complexity
/// O(s · n) collection updates for a segment of length s
///
/// # Panics
/// Panics if parents have a different number of activities.
pub fn segment_crossover<R: Rng>(
    parent1: &HeuristicsNet,
    parent2: &HeuristicsNet,
    rng: &mut R,
) -> (HeuristicsNet, HeuristicsNet) {
    let n = parent1.activity_count();
    assert_eq!(
        n,
        parent2.activity_count(),
        "parents must have the same activities"
    );

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();
    child1.clear_fitness();
    child2.clear_fitness();

    if n == 0 {
        return (child1, child2);
    }

    let (start, end) = random_segment(n, rng);
    for a in start..=end {
        child1.set_inputs(a, parent2.inputs(a).clone());
        child1.set_outputs(a, parent2.outputs(a).clone());
        child2.set_inputs(a, parent1.inputs(a).clone());
        child2.set_outputs(a, parent1.outputs(a).clone());
    }
    for a in start..=end {
        child1.reconcile(a);
        child2.reconcile(a);
    }

    (child1, child2)
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Mutates each activity with probability `rate`.
///
/// A mutated activity has one of its sides (inputs or outputs, chosen at
/// random) changed by one of:
/// - adding an arc to a random activity not yet on that side
/// - removing a random arc
/// - regrouping the side's arcs into a random partition
///
/// Returns `true` if any activity was mutated, in which case the net's
/// fitness is cleared.
pub fn mutate<R: Rng>(net: &mut HeuristicsNet, rate: f64, rng: &mut R) -> bool {
    let mut changed = false;
    for a in 0..net.activity_count() {
        if rng.random::<f64>() < rate {
            mutate_activity(net, a, rng);
            changed = true;
        }
    }
    if changed {
        net.clear_fitness();
    }
    changed
}

fn mutate_activity<R: Rng>(net: &mut HeuristicsNet, activity: usize, rng: &mut R) {
    let n = net.activity_count();
    let input_side = rng.random_bool(0.5);
    let current = if input_side {
        net.inputs(activity).union()
    } else {
        net.outputs(activity).union()
    };

    match rng.random_range(0..3) {
        0 => {
            let free: Vec<usize> = (0..n).filter(|&b| !current.contains(b)).collect();
            if free.is_empty() {
                return;
            }
            let other = free[rng.random_range(0..free.len())];
            if input_side {
                net.add_arc(other, activity);
            } else {
                net.add_arc(activity, other);
            }
        }
        1 => {
            if current.is_empty() {
                return;
            }
            let other = current.as_slice()[rng.random_range(0..current.len())];
            if input_side {
                net.remove_arc(other, activity);
            } else {
                net.remove_arc(activity, other);
            }
        }
        _ => {
            let regrouped = random_partition(&current, rng);
            if input_side {
                net.set_inputs(activity, regrouped);
            } else {
                net.set_outputs(activity, regrouped);
            }
            net.reconcile(activity);
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Splits `elements` into a random number of non-empty groups.
///
/// Every element lands in exactly one group.
pub fn random_partition<R: Rng>(elements: &OrderedIndexSet, rng: &mut R) -> IndexSetCollection {
    if elements.is_empty() {
        return IndexSetCollection::new();
    }
    let groups = rng.random_range(1..=elements.len());
    let mut buckets = vec![OrderedIndexSet::new(); groups];
    for e in elements.iter() {
        buckets[rng.random_range(0..groups)].add(e);
    }
    buckets.into_iter().filter(|b| !b.is_empty()).collect()
}

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================
