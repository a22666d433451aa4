//! XES reader.
//!
//! Reads the subset of XES the miner needs: traces, their events, and the
//! `concept:name` / `lifecycle:transition` string attributes that sit
//! directly under them. `<global>` declarations and nested attribute
//! children (lists, containers) are skipped.

use super::types::{EventLog, LogEvent, Trace};
use crate::error::{MinerError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

const CONCEPT_NAME: &str = "concept:name";
const LIFECYCLE_TRANSITION: &str = "lifecycle:transition";

/// Reads and parses an XES file.
pub fn read_xes(path: impl AsRef<Path>) -> Result<EventLog> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path).map_err(|e| MinerError::io(path, e))?;
    parse_xes(&xml)
}

/// Parses an XES document held in memory.
///
/// # Examples
///
/// ```
/// use genminer::log::parse_xes;
///
/// let xml = r#"
///   <log>
///     <trace>
///       <string key="concept:name" value="case-1"/>
///       <event><string key="concept:name" value="register"/></event>
///       <event><string key="concept:name" value="decide"/></event>
///     </trace>
///   </log>
/// "#;
///
/// let log = parse_xes(xml).unwrap();
/// assert_eq!(log.num_traces(), 1);
/// assert_eq!(log.num_events(), 2);
/// ```
pub fn parse_xes(xml: &str) -> Result<EventLog> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut builder = XesBuilder::default();
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                builder.open(&e, depth)?;
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                builder.open(&e, depth)?;
                builder.close(e.local_name().as_ref(), depth)?;
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                builder.close(e.local_name().as_ref(), depth)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(MinerError::LogFormat(format!("XML parsing error: {e}"))),
            _ => {}
        }
    }

    Ok(EventLog::new(builder.traces))
}

#[derive(Default)]
struct PendingEvent {
    name: Option<String>,
    lifecycle: Option<String>,
}

/// Accumulates traces while the reader walks the document.
///
/// Open scopes remember the depth they started at so that only direct
/// attribute children are read.
#[derive(Default)]
struct XesBuilder {
    traces: Vec<Trace>,
    trace: Option<(usize, Trace)>,
    event: Option<(usize, PendingEvent)>,
    global_depth: Option<usize>,
}

impl XesBuilder {
    fn open(&mut self, element: &BytesStart, depth: usize) -> Result<()> {
        if self.global_depth.is_some() {
            return Ok(());
        }

        match element.local_name().as_ref() {
            b"global" => self.global_depth = Some(depth),
            b"trace" => {
                if self.trace.is_none() {
                    self.trace = Some((depth, Trace::default()));
                }
            }
            b"event" => {
                if self.trace.is_some() && self.event.is_none() {
                    self.event = Some((depth, PendingEvent::default()));
                }
            }
            b"string" => {
                let (key, value) = string_attribute(element)?;
                if let Some((event_depth, event)) = self.event.as_mut() {
                    if depth == *event_depth + 1 {
                        match key.as_str() {
                            CONCEPT_NAME => event.name = Some(value),
                            LIFECYCLE_TRANSITION => event.lifecycle = Some(value),
                            _ => {}
                        }
                    }
                } else if let Some((trace_depth, trace)) = self.trace.as_mut() {
                    if depth == *trace_depth + 1 && key == CONCEPT_NAME {
                        trace.name = Some(value);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8], depth: usize) -> Result<()> {
        if let Some(global_depth) = self.global_depth {
            if name == b"global" && depth == global_depth {
                self.global_depth = None;
            }
            return Ok(());
        }

        match name {
            b"event" if matches!(self.event, Some((d, _)) if d == depth) => {
                if let Some((_, pending)) = self.event.take() {
                    let trace_index = self.traces.len();
                    let name = pending.name.ok_or_else(|| {
                        MinerError::LogFormat(format!(
                            "event without {CONCEPT_NAME} in trace #{trace_index}"
                        ))
                    })?;
                    let event = LogEvent {
                        name,
                        lifecycle: pending.lifecycle,
                    };
                    if let Some((_, trace)) = self.trace.as_mut() {
                        trace.events.push(event);
                    }
                }
            }
            b"trace" if matches!(self.trace, Some((d, _)) if d == depth) => {
                if let Some((_, trace)) = self.trace.take() {
                    self.traces.push(trace);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Extracts the `key` and `value` attributes of a `<string>` element.
fn string_attribute(element: &BytesStart) -> Result<(String, String)> {
    let mut key = String::new();
    let mut value = String::new();
    for attr in element.attributes().flatten() {
        let text = attr
            .unescape_value()
            .map_err(|e| MinerError::LogFormat(format!("bad attribute value: {e}")))?
            .into_owned();
        match attr.key.as_ref() {
            b"key" => key = text,
            b"value" => value = text,
            _ => {}
        }
    }
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<log xes.version="1.0">
  <global scope="event">
    <string key="concept:name" value="__INVALID__"/>
  </global>
  <classifier name="MXML Legacy Classifier" keys="concept:name lifecycle:transition"/>
  <trace>
    <string key="concept:name" value="case-1"/>
    <event>
      <string key="concept:name" value="register"/>
      <string key="lifecycle:transition" value="complete"/>
    </event>
    <event>
      <string key="concept:name" value="check &amp; decide"/>
      <list key="notes">
        <string key="concept:name" value="nested"/>
      </list>
    </event>
  </trace>
  <trace>
    <event>
      <string key="concept:name" value="register"/>
      <string key="lifecycle:transition" value="complete"/>
    </event>
  </trace>
</log>"#;

    #[test]
    fn test_parse_traces_and_events() {
        let log = parse_xes(SAMPLE).unwrap();
        assert_eq!(log.num_traces(), 2);
        assert_eq!(log.num_events(), 3);
        assert_eq!(log.traces()[0].name.as_deref(), Some("case-1"));
        assert_eq!(log.traces()[1].name, None);
    }

    #[test]
    fn test_parse_lifecycle_and_escapes() {
        let log = parse_xes(SAMPLE).unwrap();
        let first = &log.traces()[0].events;
        assert_eq!(first[0].class().id(), "register+complete");
        assert_eq!(first[1].name, "check & decide");
        assert_eq!(first[1].lifecycle, None);
    }

    #[test]
    fn test_globals_are_ignored() {
        let log = parse_xes(SAMPLE).unwrap();
        assert!(log
            .event_classes()
            .iter()
            .all(|c| !c.id().contains("__INVALID__")));
    }

    #[test]
    fn test_event_without_name_is_rejected() {
        let xml = r#"<log><trace><event><string key="org:resource" value="x"/></event></trace></log>"#;
        let err = parse_xes(xml).unwrap_err();
        assert!(matches!(err, MinerError::LogFormat(_)));
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        let err = parse_xes("<log><trace></log>").unwrap_err();
        assert!(matches!(err, MinerError::LogFormat(_)));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_xes("/definitely/not/here.xes").unwrap_err();
        assert!(matches!(err, MinerError::Io { .. }));
    }
}
