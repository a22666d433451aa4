//! Deterministic mapping between activity indices and event classes.

use super::types::EventClass;
use crate::arcs::OrderedIndexSet;
use crate::error::{MinerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Maps a net's activity indices to the event classes of a log.
///
/// Each event class is expanded into as many activities as it has
/// duplicates; the expanded list is sorted by class identifier and the
/// sorted position becomes the activity index. Two runs over logs with the
/// same event classes therefore number activities identically, which keeps
/// fitness values comparable and lets crossover exchange arc sets by index.
///
/// # Examples
///
/// ```
/// use genminer::log::{ActivityMapping, EventClass};
///
/// let classes = vec![EventClass::new("b"), EventClass::new("a")];
/// let mapping = ActivityMapping::new(&classes);
///
/// assert_eq!(mapping.class_of(0).unwrap().id(), "a");
/// assert_eq!(mapping.class_of(1).unwrap().id(), "b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMapping {
    /// Activity index → event class.
    activities: Vec<EventClass>,
    /// Event class → indices of the activities that duplicate it.
    reverse: BTreeMap<EventClass, OrderedIndexSet>,
}

impl ActivityMapping {
    /// One activity per distinct event class.
    pub fn new(classes: &[EventClass]) -> Self {
        let distinct: BTreeSet<&EventClass> = classes.iter().collect();
        let expanded: Vec<EventClass> = distinct.into_iter().cloned().collect();
        Self::from_expanded(expanded)
    }

    /// Allocates `counts[class]` activities to each event class.
    ///
    /// # Errors
    /// [`MinerError::Configuration`] if a class has no count, a count names
    /// a class not in `classes`, or any count is below one.
    pub fn with_duplicates(
        classes: &[EventClass],
        counts: &HashMap<EventClass, usize>,
    ) -> Result<Self> {
        let distinct: BTreeSet<&EventClass> = classes.iter().collect();

        if let Some(missing) = distinct.iter().find(|c| !counts.contains_key(**c)) {
            return Err(MinerError::Configuration(format!(
                "missing number of activities for event class {missing}"
            )));
        }
        if let Some(unknown) = counts.keys().find(|c| !distinct.contains(c)) {
            return Err(MinerError::Configuration(format!(
                "number of activities given for unknown event class {unknown}"
            )));
        }
        if let Some((class, _)) = counts.iter().find(|(_, &n)| n < 1) {
            return Err(MinerError::Configuration(format!(
                "event class {class} needs at least one activity"
            )));
        }

        let mut expanded = Vec::new();
        for class in distinct {
            for _ in 0..counts[class] {
                expanded.push(class.clone());
            }
        }
        Ok(Self::from_expanded(expanded))
    }

    fn from_expanded(mut activities: Vec<EventClass>) -> Self {
        activities.sort_by(|a, b| a.id().cmp(b.id()));

        let mut reverse: BTreeMap<EventClass, OrderedIndexSet> = BTreeMap::new();
        for (index, class) in activities.iter().enumerate() {
            reverse.entry(class.clone()).or_default().add(index);
        }

        Self {
            activities,
            reverse,
        }
    }

    /// Number of activities (including duplicates).
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Activity index → event class, in index order.
    pub fn activities(&self) -> &[EventClass] {
        &self.activities
    }

    pub fn class_of(&self, activity: usize) -> Option<&EventClass> {
        self.activities.get(activity)
    }

    /// The activities that stand for `class`.
    pub fn activities_for(&self, class: &EventClass) -> Option<&OrderedIndexSet> {
        self.reverse.get(class)
    }

    /// Distinct event classes, sorted.
    pub fn event_classes(&self) -> impl Iterator<Item = &EventClass> {
        self.reverse.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(ids: &[&str]) -> Vec<EventClass> {
        ids.iter().map(|id| EventClass::new(*id)).collect()
    }

    #[test]
    fn test_indices_follow_sorted_identifiers() {
        let mapping = ActivityMapping::new(&classes(&["c", "a", "b"]));
        let ids: Vec<&str> = mapping.activities().iter().map(EventClass::id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(
            mapping.activities_for(&EventClass::new("c")).unwrap().as_slice(),
            &[2]
        );
    }

    #[test]
    fn test_duplicates_are_contiguous() {
        let cs = classes(&["b", "a"]);
        let counts: HashMap<EventClass, usize> =
            [(EventClass::new("a"), 2), (EventClass::new("b"), 3)]
                .into_iter()
                .collect();
        let mapping = ActivityMapping::with_duplicates(&cs, &counts).unwrap();
        assert_eq!(mapping.len(), 5);
        assert_eq!(
            mapping.activities_for(&EventClass::new("a")).unwrap().as_slice(),
            &[0, 1]
        );
        assert_eq!(
            mapping.activities_for(&EventClass::new("b")).unwrap().as_slice(),
            &[2, 3, 4]
        );
    }

    #[test]
    fn test_deterministic_across_builds() {
        let counts: HashMap<EventClass, usize> = [
            (EventClass::new("x"), 1),
            (EventClass::new("y"), 2),
            (EventClass::new("z"), 1),
        ]
        .into_iter()
        .collect();
        let first = ActivityMapping::with_duplicates(&classes(&["z", "x", "y"]), &counts).unwrap();
        let second = ActivityMapping::with_duplicates(&classes(&["y", "z", "x"]), &counts).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_missing_count_is_configuration_error() {
        let counts: HashMap<EventClass, usize> = [(EventClass::new("a"), 1)].into_iter().collect();
        let err = ActivityMapping::with_duplicates(&classes(&["a", "b"]), &counts).unwrap_err();
        assert!(matches!(err, MinerError::Configuration(_)));
    }

    #[test]
    fn test_zero_count_is_configuration_error() {
        let counts: HashMap<EventClass, usize> =
            [(EventClass::new("a"), 1), (EventClass::new("b"), 0)]
                .into_iter()
                .collect();
        let err = ActivityMapping::with_duplicates(&classes(&["a", "b"]), &counts).unwrap_err();
        assert!(matches!(err, MinerError::Configuration(_)));
    }

    #[test]
    fn test_unknown_class_count_is_configuration_error() {
        let counts: HashMap<EventClass, usize> =
            [(EventClass::new("a"), 1), (EventClass::new("q"), 1)]
                .into_iter()
                .collect();
        let err = ActivityMapping::with_duplicates(&classes(&["a"]), &counts).unwrap_err();
        assert!(matches!(err, MinerError::Configuration(_)));
    }
}
