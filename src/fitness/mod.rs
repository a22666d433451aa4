//! Fitness evaluation.
//!
//! [`FitnessEvaluator`] replays every trace of the log on a net through a
//! [`ReplayEngine`], accumulates a per-call [`ReplayTotals`] and turns it
//! into a scalar that rewards parsed events and penalizes missing and
//! leftover tokens. [`ContinuousSemanticsReplay`] is the default engine.
//!
//! # References
//!
//! - de Medeiros, Weijters & van der Aalst (2007), "Genetic process mining:
//!   an experimental evaluation", *Data Mining and Knowledge Discovery*
//!   14(2), 245-304

mod evaluator;
mod replay;

pub use evaluator::{FitnessEvaluator, ReplayTotals};
pub use replay::{ContinuousSemanticsReplay, ReplayEngine, ReplayOutcome};
