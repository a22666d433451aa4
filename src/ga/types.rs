//! Collaborator traits between the pipeline and the genetic operators.
//!
//! [`InitialPopulationBuilder`] and [`PopulationBuilder`] are the contract
//! between the generation pipeline and whatever policy creates and
//! recombines heuristics nets.

use crate::log::{ActivityMapping, EventLog};
use crate::net::HeuristicsNet;
use rand::Rng;

/// Creates generation 0.
///
/// # Implementing
///
/// ```ignore
/// struct Empty;
///
/// impl InitialPopulationBuilder for Empty {
///     fn build<R: Rng>(&self, size: usize, _log: &EventLog, mapping: &ActivityMapping,
///                      _power: i32, _rng: &mut R) -> Vec<HeuristicsNet> {
///         (0..size).map(|_| HeuristicsNet::new(mapping.len())).collect()
///     }
/// }
/// ```
///
/// # Thread Safety
///
/// Builders are shared with the coordinator's workers and must be
/// `Send + Sync`.
pub trait InitialPopulationBuilder: Send + Sync {
    /// Returns exactly `size` nets over the activities of `mapping`.
    ///
    /// `power` is the exponent applied to dependency measures when deciding
    /// which arcs a net starts with; `rng` is already seeded for the run.
    fn build<R: Rng>(
        &self,
        size: usize,
        log: &EventLog,
        mapping: &ActivityMapping,
        power: i32,
        rng: &mut R,
    ) -> Vec<HeuristicsNet>;
}

/// Produces the next generation of one split.
///
/// The builder receives owned nets that nothing else references and must
/// return the same number of nets. The coordinator restamps the `key` of
/// every output with the key of the input at the same position, so
/// builders need not preserve keys themselves.
///
/// # Thread Safety
///
/// Splits are recombined in parallel, so builders must be `Send + Sync`.
pub trait PopulationBuilder: Send + Sync {
    fn build<R: Rng>(&self, population: Vec<HeuristicsNet>, rng: &mut R) -> Vec<HeuristicsNet>;
}
