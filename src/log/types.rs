//! In-memory event log.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of an event class, as produced by the standard classifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventClass(String);

impl EventClass {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One event of a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Activity name (`concept:name`).
    pub name: String,
    /// Lifecycle transition (`lifecycle:transition`), if recorded.
    pub lifecycle: Option<String>,
}

impl LogEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lifecycle: None,
        }
    }

    pub fn with_lifecycle(mut self, lifecycle: impl Into<String>) -> Self {
        self.lifecycle = Some(lifecycle.into());
        self
    }

    /// Classifies the event by name and lifecycle transition.
    ///
    /// `"A+complete"` when a transition is present, `"A"` otherwise.
    pub fn class(&self) -> EventClass {
        match &self.lifecycle {
            Some(transition) => EventClass(format!("{}+{}", self.name, transition)),
            None => EventClass(self.name.clone()),
        }
    }
}

/// One process instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub name: Option<String>,
    pub events: Vec<LogEvent>,
}

impl Trace {
    pub fn new(events: Vec<LogEvent>) -> Self {
        Self { name: None, events }
    }

    /// Builds a trace from activity names without lifecycle information.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self::new(names.iter().map(|n| LogEvent::new(n.as_ref())).collect())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A parsed event log, shared read-only for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    traces: Vec<Trace>,
}

impl EventLog {
    pub fn new(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trace> {
        self.traces.iter()
    }

    pub fn num_traces(&self) -> usize {
        self.traces.len()
    }

    pub fn num_events(&self) -> usize {
        self.traces.iter().map(Trace::len).sum()
    }

    /// Distinct event classes, sorted by identifier.
    pub fn event_classes(&self) -> Vec<EventClass> {
        self.traces
            .iter()
            .flat_map(|t| t.events.iter().map(LogEvent::class))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
