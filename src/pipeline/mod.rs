//! Generational pipeline.
//!
//! Every generation is stored as `partition_count` separate partitions and
//! becomes visible only once it is committed. A generation step runs as a
//! map phase (evaluate each net and draw its split) followed by a reduce
//! phase (rebuild every split with a [`PopulationBuilder`]).
//!
//! - [`MinerConfig`]: run parameters
//! - [`GenerationStore`]: durable, partitioned generation storage
//!   ([`FsGenerationStore`], [`MemoryGenerationStore`])
//! - [`GenerationCoordinator`]: the driver, with resume and cancellation
//! - [`rank_population`] / [`write_result`]: the final result set
//!
//! [`PopulationBuilder`]: crate::ga::PopulationBuilder

mod config;
mod result;
mod runner;
mod split;
mod store;

pub use config::{MinerConfig, MIN_POPULATION_SIZE};
pub use result::{
    rank_population, read_result, result_file_name, write_result, MinerResult, RankedNet,
};
pub use runner::{GenerationCoordinator, RunState};
pub use split::{split_count, stage_seed, SplitAssigner, Stage};
pub use store::{FsGenerationStore, GenerationRecord, GenerationStore, MemoryGenerationStore};
