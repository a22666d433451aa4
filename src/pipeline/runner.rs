//! Multi-generation pipeline execution.
//!
//! [`GenerationCoordinator`] drives a run through its stages:
//! load log → write generation 0 → (evaluate → shuffle → recombine) per
//! generation → collect and rank the last generation.

use super::config::MinerConfig;
use super::result::{rank_population, MinerResult, RankedNet};
use super::split::{stage_seed, SplitAssigner, Stage};
use super::store::{GenerationRecord, GenerationStore};
use crate::error::{MinerError, Result};
use crate::fitness::{ContinuousSemanticsReplay, FitnessEvaluator, ReplayEngine};
use crate::ga::{
    HeuristicInitialPopulation, InitialPopulationBuilder, NextPopulation, PopulationBuilder,
};
use crate::log::{read_xes, ActivityMapping, EventLog};
use crate::net::HeuristicsNet;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Stage the coordinator is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Init,
    LoadLog,
    WriteGen0,
    Evaluating(usize),
    Recombining(usize),
    CollectingFinal,
    Done,
    Failed(String),
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Init => write!(f, "Init"),
            RunState::LoadLog => write!(f, "LoadLog"),
            RunState::WriteGen0 => write!(f, "WriteGen0"),
            RunState::Evaluating(g) => write!(f, "Evaluating({g})"),
            RunState::Recombining(g) => write!(f, "Recombining({g})"),
            RunState::CollectingFinal => write!(f, "CollectingFinal"),
            RunState::Done => write!(f, "Done"),
            RunState::Failed(reason) => write!(f, "Failed({reason})"),
        }
    }
}

/// Shared, read-only inputs of one run.
struct RunContext {
    log: Arc<EventLog>,
    mapping: Arc<ActivityMapping>,
    seed: u64,
}

/// Executes the generational pipeline against a [`GenerationStore`].
///
/// Generation `g` is only read after it has been committed, so the store
/// always holds a prefix of complete generations plus at most one
/// generation in flight. A failed or cancelled run discards the generation
/// in flight.
///
/// # Usage
///
/// ```ignore
/// let store = FsGenerationStore::new("population", 4);
/// let config = MinerConfig::default().with_generations(20).with_seed(42);
/// let mut coordinator = GenerationCoordinator::new(config, store);
/// let result = coordinator.run(Path::new("log.xes"))?;
/// println!("best: {:?}", result.best().map(|r| r.individual.fitness()));
/// ```
pub struct GenerationCoordinator<
    S,
    I = HeuristicInitialPopulation,
    B = NextPopulation,
    R = ContinuousSemanticsReplay,
> {
    config: MinerConfig,
    store: S,
    initial: I,
    builder: B,
    replay: R,
    states: Vec<RunState>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<S: GenerationStore> GenerationCoordinator<S> {
    /// Creates a coordinator with the default collaborators.
    pub fn new(config: MinerConfig, store: S) -> Self {
        let builder = NextPopulation::from_config(&config);
        Self::with_collaborators(
            config,
            store,
            HeuristicInitialPopulation,
            builder,
            ContinuousSemanticsReplay,
        )
    }
}

impl<S, I, B, R> GenerationCoordinator<S, I, B, R>
where
    S: GenerationStore,
    I: InitialPopulationBuilder,
    B: PopulationBuilder,
    R: ReplayEngine,
{
    pub fn with_collaborators(
        config: MinerConfig,
        store: S,
        initial: I,
        builder: B,
        replay: R,
    ) -> Self {
        Self {
            config,
            store,
            initial,
            builder,
            replay,
            states: Vec::new(),
            cancel: None,
        }
    }

    /// Stops the run between stages once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current state; `Init` before the first run.
    pub fn state(&self) -> &RunState {
        self.states.last().unwrap_or(&RunState::Init)
    }

    /// Every state of the last run, in order.
    pub fn states(&self) -> &[RunState] {
        &self.states
    }

    /// Loads the XES log at `log_path` and runs the pipeline.
    #[instrument(level = "info", skip(self, log_path), fields(log = %log_path.display()))]
    pub fn run(&mut self, log_path: &Path) -> Result<MinerResult> {
        self.start(|| read_xes(log_path))
    }

    /// Runs the pipeline on an already loaded log.
    #[instrument(level = "info", skip_all, fields(traces = log.num_traces()))]
    pub fn run_on_log(&mut self, log: EventLog) -> Result<MinerResult> {
        self.start(move || Ok(log))
    }

    fn start<F>(&mut self, load: F) -> Result<MinerResult>
    where
        F: FnOnce() -> Result<EventLog>,
    {
        self.states.clear();
        self.transition(RunState::Init);
        let outcome = self.load_and_execute(load);
        self.finish(outcome)
    }

    fn load_and_execute<F>(&mut self, load: F) -> Result<MinerResult>
    where
        F: FnOnce() -> Result<EventLog>,
    {
        self.validate()?;
        self.transition(RunState::LoadLog);
        let log = load()?;
        self.execute(log)
    }

    fn validate(&self) -> Result<()> {
        self.config.validate().map_err(MinerError::Configuration)?;
        if self.store.partition_count() != self.config.partition_count {
            return Err(MinerError::Configuration(format!(
                "store has {} partitions, configuration expects {}",
                self.store.partition_count(),
                self.config.partition_count
            )));
        }
        Ok(())
    }

    fn finish(&mut self, outcome: Result<MinerResult>) -> Result<MinerResult> {
        match outcome {
            Ok(result) => {
                self.transition(RunState::Done);
                Ok(result)
            }
            Err(e) => {
                error!(error = %e, state = %self.state(), "run failed");
                self.transition(RunState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn transition(&mut self, state: RunState) {
        info!(state = %state, "state transition");
        self.states.push(state);
    }

    fn check_cancel(&self, generation: usize) -> Result<()> {
        if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return Err(MinerError::Cancelled(generation));
        }
        Ok(())
    }

    /// Discards an uncommitted generation after a failure.
    fn abandon(&self, generation: usize) {
        if let Err(e) = self.store.discard(generation) {
            warn!(generation, error = %e, "could not discard generation in flight");
        }
    }

    fn execute(&mut self, log: EventLog) -> Result<MinerResult> {
        if log.num_events() == 0 {
            return Err(MinerError::Configuration("event log has no events".into()));
        }
        let mapping = ActivityMapping::new(&log.event_classes());
        let seed = self.config.seed.unwrap_or_else(rand::random);
        info!(
            traces = log.num_traces(),
            events = log.num_events(),
            activities = mapping.len(),
            seed,
            "log loaded"
        );
        let ctx = RunContext {
            log: Arc::new(log),
            mapping: Arc::new(mapping),
            seed,
        };

        let last = self.config.generations;
        let resumed_from = if self.config.resume {
            self.resume_point()?
        } else {
            None
        };

        let first = match resumed_from {
            Some(committed) => {
                info!(committed, "resuming after last committed generation");
                committed + 1
            }
            None => {
                for g in 0..=last {
                    self.store.discard(g)?;
                }
                self.transition(RunState::WriteGen0);
                let written = self
                    .check_cancel(0)
                    .and_then(|()| self.write_initial(&ctx));
                if let Err(e) = written {
                    self.abandon(0);
                    return Err(e);
                }
                1
            }
        };

        let mut fitness_history = Vec::new();
        for g in first..=last {
            let started = Instant::now();
            if let Err(e) = self.advance(g, &ctx, &mut fitness_history) {
                self.abandon(g);
                return Err(e);
            }
            info!(
                generation = g,
                elapsed_ms = started.elapsed().as_millis() as u64,
                best_fitness = fitness_history.last().copied().unwrap_or(f64::NAN),
                "generation committed"
            );
        }

        self.transition(RunState::CollectingFinal);
        let ranked = self.collect_final(last, &ctx, &mut fitness_history)?;

        Ok(MinerResult {
            ranked,
            generations: last,
            resumed_from,
            fitness_history,
        })
    }

    /// Evaluates generation `g - 1` and recombines it into generation `g`.
    fn advance(&mut self, g: usize, ctx: &RunContext, history: &mut Vec<f64>) -> Result<()> {
        self.check_cancel(g)?;
        self.store.discard(g)?;

        self.transition(RunState::Evaluating(g));
        let (shuffled, best) = self.evaluate_generation(g, ctx)?;
        history.push(best);

        self.check_cancel(g)?;
        self.transition(RunState::Recombining(g));
        self.recombine(g, shuffled, ctx)
    }

    /// Longest prefix of committed generations, clearing anything after it.
    fn resume_point(&self) -> Result<Option<usize>> {
        let last = self.config.generations;
        let mut committed = None;
        for g in 0..=last {
            if !self.store.is_complete(g)? {
                break;
            }
            committed = Some(g);
        }
        let next = committed.map_or(0, |c| c + 1);
        for g in next..=last {
            if self.store.exists(g)? {
                warn!(generation = g, "discarding incomplete generation");
                self.store.discard(g)?;
            }
        }
        Ok(committed)
    }

    #[instrument(level = "debug", skip_all, fields(population = self.config.population_size))]
    fn write_initial(&self, ctx: &RunContext) -> Result<()> {
        let size = self.config.population_size;
        let mut rng = StdRng::seed_from_u64(stage_seed(ctx.seed, Stage::Initial, 0, 0));
        let nets = self
            .initial
            .build(size, &ctx.log, &ctx.mapping, self.config.power, &mut rng);
        if nets.len() != size {
            return Err(MinerError::BuilderContract {
                expected: size,
                actual: nets.len(),
            });
        }

        let partitions = self.store.partition_count();
        let mut records = vec![Vec::new(); partitions];
        for (i, mut net) in nets.into_iter().enumerate() {
            net.set_key(i);
            let p = i % partitions;
            records[p].push(GenerationRecord::new(p, net));
        }
        self.write_generation(0, &records)
    }

    fn write_generation(&self, generation: usize, records: &[Vec<GenerationRecord>]) -> Result<()> {
        for (p, partition) in records.iter().enumerate() {
            self.store.write_partition(generation, p, partition)?;
        }
        self.store.commit(generation)
    }

    /// Map phase: one worker per partition of generation `g - 1`.
    ///
    /// Returns the nets grouped by split and the best fitness seen.
    #[instrument(level = "debug", skip(self, ctx))]
    fn evaluate_generation(
        &self,
        g: usize,
        ctx: &RunContext,
    ) -> Result<(BTreeMap<usize, Vec<HeuristicsNet>>, f64)> {
        let partitions = self.store.read_partitions(g - 1)?;
        let evaluator = FitnessEvaluator::new(ctx.log.clone(), ctx.mapping.clone(), &self.replay);
        let splits = self.config.split_count();

        let mut shuffled: BTreeMap<usize, Vec<HeuristicsNet>> = BTreeMap::new();
        let mut best = f64::NEG_INFINITY;
        for (worker, records) in partitions.into_iter().enumerate() {
            let nets: Vec<HeuristicsNet> = records.into_iter().map(|r| r.individual).collect();
            let evaluated = self.evaluate_all(&evaluator, nets);

            let mut assigner =
                SplitAssigner::new(splits, stage_seed(ctx.seed, Stage::Evaluate, g, worker));
            for net in evaluated {
                if let Some(f) = net.fitness() {
                    best = best.max(f);
                }
                shuffled.entry(assigner.assign()).or_default().push(net);
            }
        }

        debug!(
            splits = shuffled.len(),
            sizes = ?shuffled.values().map(Vec::len).collect::<Vec<_>>(),
            "shuffle complete"
        );
        Ok((shuffled, best))
    }

    fn evaluate_all<E: ReplayEngine>(
        &self,
        evaluator: &FitnessEvaluator<E>,
        nets: Vec<HeuristicsNet>,
    ) -> Vec<HeuristicsNet> {
        if self.config.parallel {
            nets.into_par_iter()
                .map(|net| evaluator.evaluate(net))
                .collect()
        } else {
            nets.into_iter().map(|net| evaluator.evaluate(net)).collect()
        }
    }

    /// Reduce phase: every split is rebuilt independently and routed to
    /// partition `split % partition_count`.
    #[instrument(level = "debug", skip(self, shuffled, ctx))]
    fn recombine(
        &self,
        g: usize,
        shuffled: BTreeMap<usize, Vec<HeuristicsNet>>,
        ctx: &RunContext,
    ) -> Result<()> {
        let build = |(split, nets): (usize, Vec<HeuristicsNet>)| {
            let keys: Vec<usize> = nets.iter().map(HeuristicsNet::key).collect();
            let mut rng = StdRng::seed_from_u64(stage_seed(ctx.seed, Stage::Recombine, g, split));
            let mut next = self.builder.build(nets, &mut rng);
            if next.len() != keys.len() {
                return Err(MinerError::BuilderContract {
                    expected: keys.len(),
                    actual: next.len(),
                });
            }
            for (net, key) in next.iter_mut().zip(keys) {
                net.set_key(key);
            }
            Ok((split, next))
        };

        let work: Vec<(usize, Vec<HeuristicsNet>)> = shuffled.into_iter().collect();
        let rebuilt: Vec<(usize, Vec<HeuristicsNet>)> = if self.config.parallel {
            work.into_par_iter().map(build).collect::<Result<_>>()?
        } else {
            work.into_iter().map(build).collect::<Result<_>>()?
        };

        let partitions = self.store.partition_count();
        let mut records = vec![Vec::new(); partitions];
        for (split, nets) in rebuilt {
            let p = split % partitions;
            records[p].extend(nets.into_iter().map(|net| GenerationRecord::new(p, net)));
        }
        self.write_generation(g, &records)
    }

    /// Re-evaluates the last generation and keeps the best nets.
    fn collect_final(
        &self,
        last: usize,
        ctx: &RunContext,
        history: &mut Vec<f64>,
    ) -> Result<Vec<RankedNet>> {
        let nets: Vec<HeuristicsNet> = self
            .store
            .read_generation(last)?
            .into_iter()
            .map(|r| r.individual)
            .collect();
        let evaluator = FitnessEvaluator::new(ctx.log.clone(), ctx.mapping.clone(), &self.replay);
        let evaluated = self.evaluate_all(&evaluator, nets);

        let best = evaluated
            .iter()
            .filter_map(HeuristicsNet::fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        history.push(best);

        let ranked = rank_population(evaluated, self.config.result_limit());
        info!(
            kept = ranked.len(),
            best_fitness = best,
            "final generation ranked"
        );
        Ok(ranked)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Trace;
    use crate::pipeline::{FsGenerationStore, MemoryGenerationStore};
    use rand::Rng;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn sample_log() -> EventLog {
        let traces: [&[&str]; 5] = [
            &["a", "b", "c", "d"],
            &["a", "c", "b", "d"],
            &["a", "e", "d"],
            &["a", "b", "c", "d"],
            &["a", "e", "d"],
        ];
        EventLog::new(traces.into_iter().map(Trace::from_names).collect())
    }

    fn config(generations: usize) -> MinerConfig {
        MinerConfig::default()
            .with_population_size(600)
            .with_generations(generations)
            .with_partition_count(4)
            .with_seed(42)
    }

    fn keys(store: &dyn GenerationStore, generation: usize) -> BTreeSet<usize> {
        store
            .read_generation(generation)
            .unwrap()
            .iter()
            .map(|r| r.individual.key())
            .collect()
    }

    /// Drops the last net of every split.
    struct Shrinking;

    impl PopulationBuilder for Shrinking {
        fn build<R: Rng>(&self, mut population: Vec<HeuristicsNet>, _rng: &mut R) -> Vec<HeuristicsNet> {
            population.pop();
            population
        }
    }

    /// Raises the cancel flag the first time it recombines.
    struct CancelDuringRecombine {
        flag: Arc<AtomicBool>,
    }

    impl PopulationBuilder for CancelDuringRecombine {
        fn build<R: Rng>(&self, population: Vec<HeuristicsNet>, rng: &mut R) -> Vec<HeuristicsNet> {
            self.flag.store(true, Ordering::Relaxed);
            NextPopulation::default().build(population, rng)
        }
    }

    // ---- Full runs ----

    #[test]
    fn test_three_generations_four_partitions() {
        let store = MemoryGenerationStore::new(4);
        let mut coordinator = GenerationCoordinator::new(config(3), &store);
        let result = coordinator.run_on_log(sample_log()).unwrap();

        for g in 0..=3 {
            assert!(store.is_complete(g).unwrap(), "generation {g} not committed");
            assert_eq!(store.read_partitions(g).unwrap().len(), 4);
            assert_eq!(keys(&store, g), (0..600).collect::<BTreeSet<_>>());
        }
        assert!(!store.exists(4).unwrap());

        assert_eq!(result.generations, 3);
        assert_eq!(result.ranked.len(), 100);
        let fitness: Vec<f64> = result
            .ranked
            .iter()
            .map(|r| r.individual.fitness().unwrap())
            .collect();
        assert!(fitness.windows(2).all(|w| w[0] <= w[1]), "not ascending");
        let ranks: Vec<usize> = result.ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=100).collect::<Vec<_>>());
        assert_eq!(result.fitness_history.len(), 4);
        assert_eq!(result.resumed_from, None);
    }

    #[test]
    fn test_state_sequence() {
        let store = MemoryGenerationStore::new(4);
        let mut coordinator = GenerationCoordinator::new(config(2), &store);
        coordinator.run_on_log(sample_log()).unwrap();
        assert_eq!(
            coordinator.states(),
            &[
                RunState::Init,
                RunState::LoadLog,
                RunState::WriteGen0,
                RunState::Evaluating(1),
                RunState::Recombining(1),
                RunState::Evaluating(2),
                RunState::Recombining(2),
                RunState::CollectingFinal,
                RunState::Done,
            ]
        );
        assert_eq!(coordinator.state(), &RunState::Done);
    }

    #[test]
    fn test_partition_keys_match_partition() {
        let store = MemoryGenerationStore::new(4);
        GenerationCoordinator::new(config(1), &store)
            .run_on_log(sample_log())
            .unwrap();
        for g in 0..=1 {
            for (p, records) in store.read_partitions(g).unwrap().iter().enumerate() {
                assert!(records.iter().all(|r| r.partition_key == p));
            }
        }
        // three splits over four partitions: the last one stays empty
        assert!(store.read_partitions(1).unwrap()[3].is_empty());
    }

    #[test]
    fn test_same_seed_same_result() {
        let run = |parallel| {
            let store = MemoryGenerationStore::new(4);
            GenerationCoordinator::new(config(2).with_parallel(parallel), &store)
                .run_on_log(sample_log())
                .unwrap()
                .ranked
        };
        let sequential = run(false);
        assert_eq!(sequential, run(false));
        assert_eq!(sequential, run(true));
    }

    #[test]
    fn test_run_from_xes_file() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("log.xes");
        let mut xml = String::from("<log>");
        for trace in sample_log().iter() {
            xml.push_str("<trace>");
            for event in &trace.events {
                xml.push_str(&format!(
                    r#"<event><string key="concept:name" value="{}"/></event>"#,
                    event.name
                ));
            }
            xml.push_str("</trace>");
        }
        xml.push_str("</log>");
        std::fs::write(&log_path, xml).unwrap();

        let store = FsGenerationStore::new(dir.path().join("population"), 4);
        let mut coordinator = GenerationCoordinator::new(config(1), &store);
        let result = coordinator.run(&log_path).unwrap();
        assert_eq!(result.ranked.len(), 100);
        assert!(dir.path().join("population/gen1/_SUCCESS").is_file());
    }

    // ---- Resume ----

    #[test]
    fn test_resume_after_partial_generation() {
        let store = MemoryGenerationStore::new(4);
        GenerationCoordinator::new(config(2), &store)
            .run_on_log(sample_log())
            .unwrap();

        // generation 2 half written
        let survivors = store.read_partitions(2).unwrap();
        store.discard(2).unwrap();
        store.write_partition(2, 0, &survivors[0]).unwrap();

        let mut coordinator = GenerationCoordinator::new(config(3).with_resume(true), &store);
        let result = coordinator.run_on_log(sample_log()).unwrap();

        assert_eq!(result.resumed_from, Some(1));
        assert!(!coordinator.states().contains(&RunState::WriteGen0));
        assert!(!coordinator.states().contains(&RunState::Evaluating(1)));
        assert!(coordinator.states().contains(&RunState::Evaluating(2)));
        for g in 0..=3 {
            assert!(store.is_complete(g).unwrap());
        }
        assert_eq!(keys(&store, 3).len(), 600);
    }

    #[test]
    fn test_resume_with_nothing_left_to_evolve() {
        let store = MemoryGenerationStore::new(4);
        GenerationCoordinator::new(config(1), &store)
            .run_on_log(sample_log())
            .unwrap();

        let mut coordinator = GenerationCoordinator::new(config(1).with_resume(true), &store);
        let result = coordinator.run_on_log(sample_log()).unwrap();
        assert_eq!(result.resumed_from, Some(1));
        assert_eq!(result.fitness_history.len(), 1);
        assert!(!coordinator
            .states()
            .iter()
            .any(|s| matches!(s, RunState::Evaluating(_))));
    }

    #[test]
    fn test_resume_on_empty_store_starts_over() {
        let store = MemoryGenerationStore::new(4);
        let mut coordinator = GenerationCoordinator::new(config(1).with_resume(true), &store);
        let result = coordinator.run_on_log(sample_log()).unwrap();
        assert_eq!(result.resumed_from, None);
        assert!(coordinator.states().contains(&RunState::WriteGen0));
    }

    // ---- Failures ----

    #[test]
    fn test_cancel_discards_generation_in_flight() {
        let store = MemoryGenerationStore::new(4);
        let flag = Arc::new(AtomicBool::new(false));
        let config = config(3);
        let mut coordinator = GenerationCoordinator::with_collaborators(
            config,
            &store,
            HeuristicInitialPopulation,
            CancelDuringRecombine { flag: flag.clone() },
            ContinuousSemanticsReplay,
        )
        .with_cancel(flag);

        let err = coordinator.run_on_log(sample_log()).unwrap_err();
        assert!(matches!(err, MinerError::Cancelled(2)), "got {err}");
        assert!(store.is_complete(1).unwrap());
        assert!(!store.exists(2).unwrap());
        assert!(matches!(coordinator.state(), RunState::Failed(_)));
    }

    #[test]
    fn test_cancel_before_start() {
        let store = MemoryGenerationStore::new(4);
        let mut coordinator = GenerationCoordinator::new(config(1), &store)
            .with_cancel(Arc::new(AtomicBool::new(true)));
        let err = coordinator.run_on_log(sample_log()).unwrap_err();
        assert!(matches!(err, MinerError::Cancelled(0)));
        assert!(!store.exists(0).unwrap());
    }

    #[test]
    fn test_builder_contract_violation() {
        let store = MemoryGenerationStore::new(4);
        let mut coordinator = GenerationCoordinator::with_collaborators(
            config(2),
            &store,
            HeuristicInitialPopulation,
            Shrinking,
            ContinuousSemanticsReplay,
        );
        let err = coordinator.run_on_log(sample_log()).unwrap_err();
        assert!(matches!(err, MinerError::BuilderContract { .. }), "got {err}");
        assert!(store.is_complete(0).unwrap());
        assert!(!store.exists(1).unwrap());
        assert!(matches!(coordinator.state(), RunState::Failed(_)));
    }

    #[test]
    fn test_population_below_minimum() {
        let store = MemoryGenerationStore::new(4);
        let mut coordinator =
            GenerationCoordinator::new(config(1).with_population_size(100), &store);
        let err = coordinator.run_on_log(sample_log()).unwrap_err();
        assert!(matches!(err, MinerError::Configuration(_)));
        assert!(!coordinator.states().contains(&RunState::LoadLog));
        assert!(!store.exists(0).unwrap());
    }

    #[test]
    fn test_store_partition_mismatch() {
        let store = MemoryGenerationStore::new(3);
        let err = GenerationCoordinator::new(config(1), &store)
            .run_on_log(sample_log())
            .unwrap_err();
        assert!(matches!(err, MinerError::Configuration(_)));
    }

    #[test]
    fn test_empty_log() {
        let store = MemoryGenerationStore::new(4);
        let err = GenerationCoordinator::new(config(1), &store)
            .run_on_log(EventLog::default())
            .unwrap_err();
        assert!(matches!(err, MinerError::Configuration(_)));
    }

    #[test]
    fn test_missing_log_file() {
        let store = MemoryGenerationStore::new(4);
        let mut coordinator = GenerationCoordinator::new(config(1), &store);
        let err = coordinator
            .run(Path::new("/no/such/dir/log.xes"))
            .unwrap_err();
        assert!(matches!(err, MinerError::Io { .. }));
        assert!(matches!(coordinator.state(), RunState::Failed(_)));
    }
}
