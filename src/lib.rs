//! Partitioned generational genetic miner for heuristics nets.
//!
//! Mines a process model from an event log by evolving a population of
//! heuristics nets. Fitness comes from replaying every trace of the log on
//! each net; the population is recombined in independent splits and every
//! generation is checkpointed, so an interrupted run resumes from its last
//! committed generation.
//!
//! # Modules
//!
//! - [`arcs`]: ordered index sets and collections of them (the arc sets)
//! - [`net`]: the [`HeuristicsNet`](net::HeuristicsNet) individual
//! - [`log`]: event logs, XES reading and the activity mapping
//! - [`fitness`]: token replay and the fitness function
//! - [`ga`]: initial population, selection, crossover and mutation
//! - [`pipeline`]: configuration, generation storage and the coordinator
//!
//! # Example
//!
//! ```
//! use genminer::log::{EventLog, Trace};
//! use genminer::pipeline::{GenerationCoordinator, MemoryGenerationStore, MinerConfig};
//!
//! let log = EventLog::new(vec![
//!     Trace::from_names(&["register", "check", "decide"]),
//!     Trace::from_names(&["register", "decide"]),
//! ]);
//!
//! let config = MinerConfig::default().with_generations(1).with_seed(7);
//! let store = MemoryGenerationStore::new(config.partition_count);
//! let mut coordinator = GenerationCoordinator::new(config, store);
//!
//! let result = coordinator.run_on_log(log).unwrap();
//! assert_eq!(result.ranked.len(), 100);
//! ```

pub mod arcs;
pub mod error;
pub mod fitness;
pub mod ga;
pub mod log;
pub mod net;
pub mod pipeline;

pub use error::{MinerError, Result};
