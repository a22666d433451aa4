//! Sorted, duplicate-free collection of [`OrderedIndexSet`]s.

use super::subset::OrderedIndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One side (inputs or outputs) of an activity's arc specification.
///
/// Each member is an OR-group of activity indices; the members together
/// form an AND over the groups. Members are kept in [`OrderedIndexSet`]
/// order and every insertion or removal goes through a binary search, so
/// the collection never holds two members that compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<OrderedIndexSet>", into = "Vec<OrderedIndexSet>")]
pub struct IndexSetCollection {
    members: Vec<OrderedIndexSet>,
}

impl IndexSetCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if there are no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member at sorted position `index`.
    pub fn get(&self, index: usize) -> Option<&OrderedIndexSet> {
        self.members.get(index)
    }

    /// Iterates the members in order.
    pub fn iter(&self) -> std::slice::Iter<'_, OrderedIndexSet> {
        self.members.iter()
    }

    /// Returns `true` if an equal member is present.
    pub fn contains(&self, subset: &OrderedIndexSet) -> bool {
        self.members.binary_search(subset).is_ok()
    }

    /// Returns `true` if any member contains `element`.
    pub fn contains_element(&self, element: usize) -> bool {
        self.members.iter().any(|m| m.contains(element))
    }

    /// Inserts `subset` unless an equal member exists.
    pub fn add(&mut self, subset: OrderedIndexSet) -> bool {
        match self.members.binary_search(&subset) {
            Ok(_) => false,
            Err(pos) => {
                self.members.insert(pos, subset);
                true
            }
        }
    }

    /// Inserts every member of `other` not already present.
    pub fn add_all(&mut self, other: &IndexSetCollection) {
        for subset in other.iter() {
            self.add(subset.clone());
        }
    }

    /// Removes the member equal to `subset`.
    pub fn remove(&mut self, subset: &OrderedIndexSet) -> bool {
        match self.members.binary_search(subset) {
            Ok(pos) => {
                self.members.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Removes every member of `other`.
    pub fn remove_all(&mut self, other: &IndexSetCollection) {
        for subset in other.iter() {
            self.remove(subset);
        }
    }

    /// One set holding every element of every member.
    pub fn union(&self) -> OrderedIndexSet {
        let mut union = OrderedIndexSet::new();
        for member in &self.members {
            union.add_all(member);
        }
        union
    }

    /// Returns a new collection with `element` stripped from every member.
    ///
    /// Members left empty are dropped; members that become equal collapse
    /// into one. `self` is not modified.
    pub fn without_element(&self, element: usize) -> Self {
        let mut result = Self::new();
        for member in &self.members {
            let mut stripped = member.clone();
            stripped.remove(element);
            if !stripped.is_empty() {
                result.add(stripped);
            }
        }
        result
    }

    /// Copies the collection, remapping every member's elements.
    ///
    /// # Panics
    /// Panics if a present element has no entry in `old_to_new`
    /// (see [`OrderedIndexSet::remap`]).
    pub fn remap(&self, old_to_new: &HashMap<usize, usize>) -> Self {
        self.members.iter().map(|m| m.remap(old_to_new)).collect()
    }
}

impl FromIterator<OrderedIndexSet> for IndexSetCollection {
    fn from_iter<T: IntoIterator<Item = OrderedIndexSet>>(iter: T) -> Self {
        let mut collection = Self::new();
        for subset in iter {
            collection.add(subset);
        }
        collection
    }
}

impl From<Vec<OrderedIndexSet>> for IndexSetCollection {
    fn from(members: Vec<OrderedIndexSet>) -> Self {
        members.into_iter().collect()
    }
}

impl From<IndexSetCollection> for Vec<OrderedIndexSet> {
    fn from(collection: IndexSetCollection) -> Self {
        collection.members
    }
}

impl fmt::Display for IndexSetCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{member}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[usize]) -> OrderedIndexSet {
        values.iter().copied().collect()
    }

    #[test]
    fn test_add_orders_and_dedups() {
        let mut c = IndexSetCollection::new();
        assert!(c.add(set(&[1, 2])));
        assert!(c.add(set(&[3])));
        assert!(c.add(set(&[0, 5])));
        assert!(!c.add(set(&[2, 1])));
        assert_eq!(c.to_string(), "[[3],[0,5],[1,2]]");
    }

    #[test]
    fn test_remove() {
        let mut c: IndexSetCollection = vec![set(&[1]), set(&[2, 3])].into();
        assert!(c.remove(&set(&[2, 3])));
        assert!(!c.remove(&set(&[2, 3])));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_add_all_remove_all() {
        let mut a: IndexSetCollection = vec![set(&[1]), set(&[2])].into();
        let b: IndexSetCollection = vec![set(&[2]), set(&[3, 4])].into();
        a.add_all(&b);
        assert_eq!(a.len(), 3);
        a.remove_all(&b);
        assert_eq!(a.to_string(), "[[1]]");
    }

    #[test]
    fn test_union() {
        let c: IndexSetCollection = vec![set(&[4, 1]), set(&[2, 4]), set(&[7])].into();
        assert_eq!(c.union().as_slice(), &[1, 2, 4, 7]);
        assert!(IndexSetCollection::new().union().is_empty());
    }

    #[test]
    fn test_without_element_drops_empties() {
        let c: IndexSetCollection = vec![set(&[1]), set(&[1, 2]), set(&[3])].into();
        let stripped = c.without_element(1);
        assert_eq!(stripped.to_string(), "[[2],[3]]");
        // input untouched
        assert_eq!(c.len(), 3);
        assert!(c.contains(&set(&[1])));
    }

    #[test]
    fn test_without_element_collapses_equal_members() {
        let c: IndexSetCollection = vec![set(&[1, 2]), set(&[2, 3])].into();
        let stripped = c.without_element(3);
        // [1,2] and [2] stay distinct
        assert_eq!(stripped.len(), 2);
        let collapsed = vec![set(&[1, 2]), set(&[2, 3])]
            .into_iter()
            .collect::<IndexSetCollection>()
            .without_element(1)
            .without_element(3);
        assert_eq!(collapsed.to_string(), "[[2]]");
    }

    #[test]
    fn test_contains_element() {
        let c: IndexSetCollection = vec![set(&[1, 2]), set(&[5])].into();
        assert!(c.contains_element(5));
        assert!(!c.contains_element(3));
    }

    #[test]
    fn test_remap_resorts_members() {
        let c: IndexSetCollection = vec![set(&[0]), set(&[1, 2])].into();
        let map: HashMap<usize, usize> = [(0, 9), (1, 0), (2, 1)].into_iter().collect();
        assert_eq!(c.remap(&map).to_string(), "[[9],[0,1]]");
    }

    #[test]
    fn test_serde_round_trip_preserves_order() {
        let c: IndexSetCollection = vec![set(&[2, 3]), set(&[1])].into();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "[[1],[2,3]]");
        let back: IndexSetCollection = serde_json::from_str("[[2,3],[1],[1]]").unwrap();
        assert_eq!(back, c);
    }
}
