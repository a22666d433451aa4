//! Continuous-semantics replay of a trace on a heuristics net.

use crate::log::{ActivityMapping, Trace};
use crate::net::HeuristicsNet;

/// Per-trace counts reported by a [`ReplayEngine`].
///
/// Signed so that an engine reporting impossible negative counts can be
/// detected and clamped by the evaluator rather than wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub missing_tokens: i64,
    pub extra_tokens: i64,
    pub parsed_events: i64,
}

/// Replays one trace on a net.
///
/// Implementations never abort on token-game violations; they count them
/// and keep going. The net's firing and arc-usage counters may be updated
/// along the way.
pub trait ReplayEngine: Send + Sync {
    fn replay(
        &self,
        net: &mut HeuristicsNet,
        trace: &Trace,
        mapping: &ActivityMapping,
    ) -> ReplayOutcome;
}

impl<T: ReplayEngine + ?Sized> ReplayEngine for &T {
    fn replay(
        &self,
        net: &mut HeuristicsNet,
        trace: &Trace,
        mapping: &ActivityMapping,
    ) -> ReplayOutcome {
        (**self).replay(net, trace, mapping)
    }
}

/// Token game with continuous semantics.
///
/// Each input group of an activity is a place. Firing `a` consumes one
/// token from every input place of `a` (an empty place counts one missing
/// token and is left at zero) and produces one token into every input place
/// of every successor that lists `a` in that group. Activities without
/// inputs consume from a shared start place holding one token; activities
/// without outputs produce into an end place.
///
/// At the end of a trace every token left behind is an extra token, except
/// the single token expected in the end place; an empty end place counts as
/// one missing token. An event is parsed when it fired without missing
/// tokens. Events whose class has no activity in the mapping are skipped.
///
/// When a class is duplicated across several activities the one with the
/// fewest missing tokens fires (lowest index on ties).
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuousSemanticsReplay;

impl ContinuousSemanticsReplay {
    pub fn new() -> Self {
        Self
    }
}

/// Token counts for one replay.
struct Marking {
    places: Vec<Vec<i64>>,
    start: i64,
    end: i64,
}

impl Marking {
    fn initial(net: &HeuristicsNet) -> Self {
        let places = (0..net.activity_count())
            .map(|a| vec![0; net.inputs(a).len()])
            .collect();
        Self {
            places,
            start: 1,
            end: 0,
        }
    }

    fn missing_for(&self, activity: usize) -> i64 {
        let places = &self.places[activity];
        if places.is_empty() {
            i64::from(self.start <= 0)
        } else {
            places.iter().filter(|&&t| t <= 0).count() as i64
        }
    }

    /// Fires `activity`, returning the number of missing tokens.
    fn fire(&mut self, net: &mut HeuristicsNet, activity: usize) -> i64 {
        let mut missing = 0;
        if self.places[activity].is_empty() {
            if self.start > 0 {
                self.start -= 1;
            } else {
                missing += 1;
            }
        } else {
            for tokens in self.places[activity].iter_mut() {
                if *tokens > 0 {
                    *tokens -= 1;
                } else {
                    missing += 1;
                }
            }
        }

        let successors = net.outputs(activity).union();
        if successors.is_empty() {
            self.end += 1;
        }
        for target in successors.iter() {
            for (group, members) in net.inputs(target).iter().enumerate() {
                if members.contains(activity) {
                    self.places[target][group] += 1;
                }
            }
            net.record_arc_usage(activity, target);
        }
        net.record_firing(activity);
        missing
    }

    /// Missing and extra tokens charged when the trace ends.
    fn settle(&self) -> (i64, i64) {
        let left: i64 = self.places.iter().flatten().sum::<i64>() + self.start;
        let missing = i64::from(self.end == 0);
        let extra = left + (self.end - 1).max(0);
        (missing, extra)
    }
}

impl ReplayEngine for ContinuousSemanticsReplay {
    fn replay(
        &self,
        net: &mut HeuristicsNet,
        trace: &Trace,
        mapping: &ActivityMapping,
    ) -> ReplayOutcome {
        let mut marking = Marking::initial(net);
        let mut outcome = ReplayOutcome::default();

        for event in &trace.events {
            let Some(candidates) = mapping.activities_for(&event.class()) else {
                continue;
            };
            let Some(activity) = candidates
                .iter()
                .filter(|&a| a < net.activity_count())
                .min_by_key(|&a| marking.missing_for(a))
            else {
                continue;
            };

            let missing = marking.fire(net, activity);
            outcome.missing_tokens += missing;
            if missing == 0 {
                outcome.parsed_events += 1;
            }
        }

        let (missing, extra) = marking.settle();
        outcome.missing_tokens += missing;
        outcome.extra_tokens += extra;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcs::OrderedIndexSet;
    use crate::log::EventClass;

    fn mapping(ids: &[&str]) -> ActivityMapping {
        let classes: Vec<EventClass> = ids.iter().map(|id| EventClass::new(*id)).collect();
        ActivityMapping::new(&classes)
    }

    /// a → b → c
    fn sequence() -> HeuristicsNet {
        let mut net = HeuristicsNet::new(3);
        net.add_arc(0, 1);
        net.add_arc(1, 2);
        net
    }

    fn replay(net: &mut HeuristicsNet, trace: &[&str], mapping: &ActivityMapping) -> ReplayOutcome {
        net.reset_usage();
        ContinuousSemanticsReplay.replay(net, &Trace::from_names(trace), mapping)
    }

    #[test]
    fn test_fitting_trace() {
        let m = mapping(&["a", "b", "c"]);
        let mut net = sequence();
        let outcome = replay(&mut net, &["a", "b", "c"], &m);
        assert_eq!(
            outcome,
            ReplayOutcome {
                missing_tokens: 0,
                extra_tokens: 0,
                parsed_events: 3
            }
        );
        assert_eq!(net.firings(1), 1);
        assert_eq!(net.arc_usage(0, 1), 1);
        assert_eq!(net.arc_usage(1, 2), 1);
    }

    #[test]
    fn test_skipped_activity_leaves_token_and_misses_one() {
        let m = mapping(&["a", "b", "c"]);
        let mut net = sequence();
        let outcome = replay(&mut net, &["a", "c"], &m);
        // c misses the token from b; the token a put for b is left over
        assert_eq!(outcome.missing_tokens, 1);
        assert_eq!(outcome.extra_tokens, 1);
        assert_eq!(outcome.parsed_events, 1);
    }

    #[test]
    fn test_and_join_needs_both_groups() {
        let m = mapping(&["a", "b", "c"]);
        // a → c and b → c as separate groups: c waits for both
        let mut net = HeuristicsNet::new(3);
        net.add_arc(0, 2);
        net.add_arc(1, 2);
        let outcome = replay(&mut net, &["a", "c"], &m);
        assert_eq!(outcome.missing_tokens, 1);
        assert_eq!(outcome.parsed_events, 1);
    }

    #[test]
    fn test_or_join_needs_one_token() {
        let m = mapping(&["a", "b", "c"]);
        let mut net = HeuristicsNet::new(3);
        net.add_arc(0, 2);
        net.add_arc(1, 2);
        let or_group: OrderedIndexSet = [0, 1].into_iter().collect();
        net.set_inputs(2, vec![or_group].into());
        net.reconcile(2);
        let outcome = replay(&mut net, &["a", "c"], &m);
        assert_eq!(outcome.missing_tokens, 0);
        assert_eq!(outcome.extra_tokens, 0);
        assert_eq!(outcome.parsed_events, 2);
    }

    #[test]
    fn test_unconnected_net_is_penalized() {
        let m = mapping(&["a", "b", "c"]);
        let mut net = HeuristicsNet::new(3);
        let outcome = replay(&mut net, &["a", "b", "c"], &m);
        assert_eq!(outcome.parsed_events, 1);
        assert_eq!(outcome.missing_tokens, 2);
        assert_eq!(outcome.extra_tokens, 2);
    }

    #[test]
    fn test_unknown_class_is_skipped() {
        let m = mapping(&["a", "b", "c"]);
        let mut net = sequence();
        let outcome = replay(&mut net, &["a", "zzz", "b", "c"], &m);
        assert_eq!(outcome.parsed_events, 3);
        assert_eq!(outcome.missing_tokens, 0);
    }

    #[test]
    fn test_duplicate_picks_enabled_activity() {
        use std::collections::HashMap;
        let classes = vec![EventClass::new("a"), EventClass::new("b")];
        let counts: HashMap<EventClass, usize> =
            [(EventClass::new("a"), 1), (EventClass::new("b"), 2)]
                .into_iter()
                .collect();
        let m = ActivityMapping::with_duplicates(&classes, &counts).unwrap();
        // activities: 0=a, 1=b, 2=b; only the second b follows a
        let mut net = HeuristicsNet::new(3);
        net.add_arc(0, 2);
        let outcome = replay(&mut net, &["a", "b"], &m);
        assert_eq!(outcome.parsed_events, 2);
        assert_eq!(net.firings(2), 1);
        assert_eq!(net.firings(1), 0);
    }
}
