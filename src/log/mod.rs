//! Event logs and the activity mapping derived from them.
//!
//! - [`EventLog`]: traces of classified events, loaded once per run
//! - [`read_xes`] / [`parse_xes`]: XES interchange-format reader
//! - [`ActivityMapping`]: deterministic activity-index ↔ event-class mapping

mod mapping;
mod types;
mod xes;

pub use mapping::ActivityMapping;
pub use types::{EventClass, EventLog, LogEvent, Trace};
pub use xes::{parse_xes, read_xes};
