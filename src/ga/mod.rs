//! Genetic operators and population builders.
//!
//! The pipeline only talks to the two builder traits; everything else in
//! this module is the default policy behind them.
//!
//! # Core Traits
//!
//! - [`InitialPopulationBuilder`]: creates generation 0 from the log
//! - [`PopulationBuilder`]: turns one split into its next generation
//!
//! # Key Types
//!
//! - [`HeuristicInitialPopulation`]: arcs drawn from dependency measures
//! - [`NextPopulation`]: elitism + [`Selection`] + crossover + mutation
//! - [`DependencyMatrix`]: directly-follows statistics of a log
//!
//! # Submodules
//!
//! - [`operators`]: crossover, mutation and regrouping of arc sets
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - de Medeiros, Weijters & van der Aalst (2007), "Genetic process mining:
//!   an experimental evaluation"

mod initial;
mod next;
pub mod operators;
mod selection;
mod types;

pub use initial::{DependencyMatrix, HeuristicInitialPopulation};
pub use next::NextPopulation;
pub use selection::Selection;
pub use types::{InitialPopulationBuilder, PopulationBuilder};
