//! Heuristics nets: the individuals being evolved.
//!
//! A [`HeuristicsNet`] is a causal matrix over activity indices whose
//! input and output arc sets are [`IndexSetCollection`]s. The numbering of
//! activities comes from the run's
//! [`ActivityMapping`](crate::log::ActivityMapping).
//!
//! [`IndexSetCollection`]: crate::arcs::IndexSetCollection

mod types;

pub use types::HeuristicsNet;
