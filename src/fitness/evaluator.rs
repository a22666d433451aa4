//! Fitness of a heuristics net against an event log.

use super::replay::{ContinuousSemanticsReplay, ReplayEngine, ReplayOutcome};
use crate::log::{ActivityMapping, EventLog};
use crate::net::HeuristicsNet;
use std::sync::Arc;
use tracing::warn;

/// Replay statistics accumulated over every trace of a log.
///
/// A fresh value is built for each evaluation; nothing is carried between
/// calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayTotals {
    /// Traces with at least one missing token (P).
    pub traces_with_missing: u64,
    /// Missing tokens over all traces (M).
    pub missing_tokens: u64,
    /// Traces with at least one leftover token (Q).
    pub traces_with_extra: u64,
    /// Leftover tokens over all traces (E).
    pub extra_tokens: u64,
    /// Events parsed without missing tokens (W).
    pub parsed_events: u64,
}

impl ReplayTotals {
    /// Adds one trace's outcome. Negative counts are clamped to zero.
    pub fn record(&mut self, outcome: ReplayOutcome, trace_index: usize) {
        let missing = clamp("missing_tokens", outcome.missing_tokens, trace_index);
        let extra = clamp("extra_tokens", outcome.extra_tokens, trace_index);
        let parsed = clamp("parsed_events", outcome.parsed_events, trace_index);

        if missing > 0 {
            self.traces_with_missing += 1;
        }
        if extra > 0 {
            self.traces_with_extra += 1;
        }
        self.missing_tokens += missing;
        self.extra_tokens += extra;
        self.parsed_events += parsed;
    }

    /// Combines the totals into a scalar fitness.
    ///
    /// ```text
    /// fitness = (W - (M / (nTraces - P + 1) + E / (nTraces - Q + 1))) / nEvents
    /// ```
    ///
    /// Both denominators are at least one because P and Q never exceed the
    /// trace count. Returns 0.0 for a log without events.
    pub fn fitness(&self, num_traces: usize, num_events: usize) -> f64 {
        if num_events == 0 {
            return 0.0;
        }
        let n = num_traces as f64;
        let missing_denom = n - self.traces_with_missing as f64 + 1.0;
        let extra_denom = n - self.traces_with_extra as f64 + 1.0;
        let penalty =
            self.missing_tokens as f64 / missing_denom + self.extra_tokens as f64 / extra_denom;
        (self.parsed_events as f64 - penalty) / num_events as f64
    }
}

fn clamp(field: &str, value: i64, trace_index: usize) -> u64 {
    if value < 0 {
        warn!(field, value, trace_index, "replay reported a negative count, using 0");
        0
    } else {
        value as u64
    }
}

/// Scores heuristics nets against a shared event log.
///
/// The log and mapping are held behind [`Arc`] so that one evaluator can be
/// cloned cheaply into every worker of a generation.
///
/// # Examples
///
/// ```
/// use genminer::fitness::FitnessEvaluator;
/// use genminer::log::{ActivityMapping, EventLog, Trace};
/// use genminer::net::HeuristicsNet;
///
/// let log = EventLog::new(vec![Trace::from_names(&["a", "b"])]);
/// let mapping = ActivityMapping::new(&log.event_classes());
/// let evaluator = FitnessEvaluator::with_default_replay(log.into(), mapping.into());
///
/// let mut net = HeuristicsNet::new(2);
/// net.add_arc(0, 1);
/// let net = evaluator.evaluate(net);
/// assert_eq!(net.fitness(), Some(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<R = ContinuousSemanticsReplay> {
    log: Arc<EventLog>,
    mapping: Arc<ActivityMapping>,
    engine: R,
}

impl FitnessEvaluator<ContinuousSemanticsReplay> {
    pub fn with_default_replay(log: Arc<EventLog>, mapping: Arc<ActivityMapping>) -> Self {
        Self::new(log, mapping, ContinuousSemanticsReplay)
    }
}

impl<R: ReplayEngine> FitnessEvaluator<R> {
    pub fn new(log: Arc<EventLog>, mapping: Arc<ActivityMapping>, engine: R) -> Self {
        Self {
            log,
            mapping,
            engine,
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn mapping(&self) -> &ActivityMapping {
        &self.mapping
    }

    /// Resets the net's usage counters and replays every trace.
    pub fn replay_totals(&self, net: &mut HeuristicsNet) -> ReplayTotals {
        net.reset_usage();
        let mut totals = ReplayTotals::default();
        for (index, trace) in self.log.iter().enumerate() {
            let outcome = self.engine.replay(net, trace, &self.mapping);
            totals.record(outcome, index);
        }
        totals
    }

    /// Computes and assigns the net's fitness.
    pub fn evaluate(&self, mut net: HeuristicsNet) -> HeuristicsNet {
        let totals = self.replay_totals(&mut net);
        net.set_fitness(totals.fitness(self.log.num_traces(), self.log.num_events()));
        net
    }
}
