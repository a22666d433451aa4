//! Arc-set data structures.
//!
//! A heuristics net describes each activity by two [`IndexSetCollection`]s:
//! its inputs and its outputs. Every member of a collection is an
//! [`OrderedIndexSet`] of activity indices that act as alternatives (OR);
//! the members combine conjunctively (AND).
//!
//! Both types keep a strict total order so they can be binary-searched,
//! compared and hashed consistently:
//!
//! - sets: shorter first, then lexicographic by element
//! - collections: members sorted by the set order, no two equal members

mod collection;
mod subset;

pub use collection::IndexSetCollection;
pub use subset::OrderedIndexSet;
