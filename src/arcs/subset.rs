//! Sorted, duplicate-free set of activity indices.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// An ordered set of small non-negative integers.
///
/// Elements are kept sorted ascending without duplicates; `add` and
/// `remove` locate their position by binary search and shift the tail,
/// which is cheap because arc subsets stay small (tens of elements).
///
/// # Ordering
///
/// Shorter sets precede longer ones; sets of equal length compare
/// lexicographically by element. `cmp == Equal` holds exactly when the two
/// sets are equal, so the order is usable as a sort and dedup key.
///
/// # Examples
///
/// ```
/// use genminer::arcs::OrderedIndexSet;
///
/// let mut set = OrderedIndexSet::new();
/// set.add(4);
/// set.add(1);
/// set.add(4);
/// assert_eq!(set.as_slice(), &[1, 4]);
/// assert!(set.contains(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct OrderedIndexSet {
    elements: Vec<usize>,
}

impl OrderedIndexSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single element.
    pub fn singleton(value: usize) -> Self {
        Self {
            elements: vec![value],
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at sorted position `index`.
    pub fn get(&self, index: usize) -> Option<usize> {
        self.elements.get(index).copied()
    }

    /// The elements in ascending order.
    pub fn as_slice(&self) -> &[usize] {
        &self.elements
    }

    /// Iterates the elements in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements.iter().copied()
    }

    /// Membership test, O(log n).
    pub fn contains(&self, value: usize) -> bool {
        self.elements.binary_search(&value).is_ok()
    }

    /// Inserts `value` at its sorted position.
    ///
    /// Returns `false` (and leaves the set untouched) if it was present.
    pub fn add(&mut self, value: usize) -> bool {
        match self.elements.binary_search(&value) {
            Ok(_) => false,
            Err(pos) => {
                self.elements.insert(pos, value);
                true
            }
        }
    }

    /// Removes `value`. Returns `false` if it was absent.
    pub fn remove(&mut self, value: usize) -> bool {
        match self.elements.binary_search(&value) {
            Ok(pos) => {
                self.elements.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Adds every element of `other`.
    pub fn add_all(&mut self, other: &OrderedIndexSet) {
        for value in other.iter() {
            self.add(value);
        }
    }

    /// Removes every element of `other`.
    pub fn remove_all(&mut self, other: &OrderedIndexSet) {
        for value in other.iter() {
            self.remove(value);
        }
    }

    /// Copies the set, replacing every element through `old_to_new`.
    ///
    /// Used when activities are renumbered. The result is re-sorted.
    ///
    /// # Panics
    /// Panics if `old_to_new` has no entry for a present element. A caller
    /// renumbering activities must supply the whole mapping.
    pub fn remap(&self, old_to_new: &HashMap<usize, usize>) -> Self {
        self.elements
            .iter()
            .map(|old| match old_to_new.get(old) {
                Some(&new) => new,
                None => panic!("no index mapping for activity {old}"),
            })
            .collect()
    }
}

impl Ord for OrderedIndexSet {
    fn cmp(&self, other: &Self) -> Ordering {
        self.elements
            .len()
            .cmp(&other.elements.len())
            .then_with(|| self.elements.cmp(&other.elements))
    }
}

impl PartialOrd for OrderedIndexSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromIterator<usize> for OrderedIndexSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut elements: Vec<usize> = iter.into_iter().collect();
        elements.sort_unstable();
        elements.dedup();
        Self { elements }
    }
}

impl From<Vec<usize>> for OrderedIndexSet {
    fn from(elements: Vec<usize>) -> Self {
        elements.into_iter().collect()
    }
}

impl From<OrderedIndexSet> for Vec<usize> {
    fn from(set: OrderedIndexSet) -> Self {
        set.elements
    }
}

impl fmt::Display for OrderedIndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}
